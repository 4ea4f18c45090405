//! Dashboard callbacks wired into a [`ReactiveGraph`] under the page's
//! widget ids.

pub mod stock_ticker;
pub mod world_bank;

use std::rc::Rc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::common::dash_exception::{DashError, DashResult};
use crate::config::BandConfig;
use crate::data::indicators::DEFAULT_INDICATOR;
use crate::data::source::PriceProvider;
use crate::data::wdi::WdiTable;
use crate::reactive::ReactiveGraph;

pub const INDICATOR_SINGLE: &str = "indicator-dropdown-single";
pub const YEAR_SLIDER: &str = "year-slider";
pub const CHOROPLETH: &str = "choropleth";
pub const CHOROPLETH_HOVER: &str = "choropleth-hover";
pub const TABLE: &str = "table";
pub const INDICATOR_OVER_TIME: &str = "indicator-over-time";
pub const INDICATOR_MULTI: &str = "indicator-dropdown";
pub const REGION_MULTI: &str = "region-dropdown";
pub const INDICATOR_TIME_SERIES: &str = "indicator-time-series";
pub const TICKER_INPUT: &str = "stock-ticker-input";
pub const SP_GRAPH: &str = "s&p-graph";

fn as_str<'a>(v: &'a Value, widget: &str) -> DashResult<&'a str> {
    v.as_str()
        .ok_or_else(|| DashError::invalid_argument(format!("{} expects a string, got {}", widget, v)))
}

/// A multi-select value: a list of strings, or a single string
fn as_str_list(v: &Value, widget: &str) -> DashResult<Vec<String>> {
    match v {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|i| as_str(i, widget).map(str::to_string))
            .collect(),
        _ => Err(DashError::invalid_argument(format!(
            "{} expects a list of strings, got {}",
            widget, v
        ))),
    }
}

fn slider_year(v: &Value) -> DashResult<i32> {
    v.get("value")
        .or(Some(v))
        .and_then(Value::as_i64)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| DashError::invalid_argument(format!("{} has no year value: {}", YEAR_SLIDER, v)))
}

fn to_json<T: Serialize>(v: &T) -> DashResult<Value> {
    Ok(serde_json::to_value(v)?)
}

/// Initial widget values of the page
pub fn default_inputs() -> Vec<(&'static str, Value)> {
    vec![
        (INDICATOR_SINGLE, json!(DEFAULT_INDICATOR)),
        (CHOROPLETH_HOVER, Value::Null),
        (
            INDICATOR_MULTI,
            json!([
                "Exports of goods and services (% of GDP)",
                "Imports of goods and services (% of GDP)"
            ]),
        ),
        (
            REGION_MULTI,
            json!(["Kuwait", "United States", "United Kingdom"]),
        ),
        (TICKER_INPUT, json!(["YHOO"])),
    ]
}

/// Bind every panel of the page to its inputs
pub fn build_dashboard(
    wdi: Rc<WdiTable>,
    prices: Rc<dyn PriceProvider>,
    config: BandConfig,
) -> DashResult<ReactiveGraph> {
    config.validate()?;
    let mut graph = ReactiveGraph::new();

    let t = wdi.clone();
    graph.bind(YEAR_SLIDER, &[INDICATOR_SINGLE], move |a| {
        to_json(&world_bank::year_slider(&t, as_str(a[0], INDICATOR_SINGLE)?)?)
    })?;

    let t = wdi.clone();
    graph.bind(CHOROPLETH, &[INDICATOR_SINGLE, YEAR_SLIDER], move |a| {
        let indicator = as_str(a[0], INDICATOR_SINGLE)?;
        to_json(&world_bank::choropleth(&t, indicator, slider_year(a[1])?)?)
    })?;

    let t = wdi.clone();
    graph.bind(TABLE, &[INDICATOR_SINGLE, YEAR_SLIDER], move |a| {
        let indicator = as_str(a[0], INDICATOR_SINGLE)?;
        to_json(&world_bank::ranking_table(&t, indicator, slider_year(a[1])?)?)
    })?;

    let t = wdi.clone();
    graph.bind(INDICATOR_OVER_TIME, &[CHOROPLETH_HOVER, INDICATOR_SINGLE], move |a| {
        let indicator = as_str(a[1], INDICATOR_SINGLE)?;
        to_json(&world_bank::country_over_time(&t, indicator, a[0])?)
    })?;

    let t = wdi;
    graph.bind(INDICATOR_TIME_SERIES, &[INDICATOR_MULTI, REGION_MULTI], move |a| {
        let indicators = as_str_list(a[0], INDICATOR_MULTI)?;
        let regions = as_str_list(a[1], REGION_MULTI)?;
        to_json(&world_bank::indicator_time_series(&t, &indicators, &regions))
    })?;

    graph.bind(SP_GRAPH, &[TICKER_INPUT], move |a| {
        let tickers = as_str_list(a[0], TICKER_INPUT)?;
        to_json(&stock_ticker::ticker_figures(&*prices, &tickers, &config)?)
    })?;

    Ok(graph)
}
