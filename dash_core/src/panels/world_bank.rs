use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::dash_exception::{DashError, DashResult, ErrCode};
use crate::data::wdi::{CountrySeries, IndicatorTraces, WdiTable};

pub const DEFAULT_COUNTRY_CODE: &str = "USA";

/// Year slider state: selectable years, current value and tick labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSlider {
    pub value: i32,
    pub min: i32,
    pub max: i32,
    pub marks: BTreeMap<i32, String>,
}

pub fn year_slider(table: &WdiTable, indicator: &str) -> DashResult<YearSlider> {
    let years = table.available_years(indicator);
    let (Some(&min), Some(&max)) = (years.first(), years.last()) else {
        return Err(DashError::new(
            format!("no data for indicator {:?}", indicator),
            ErrCode::NoData,
        ));
    };

    let label_all = years.len() < 10;
    let marks = years
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let label = if label_all || i % 5 == 0 {
                y.to_string()
            } else {
                String::new()
            };
            (y, label)
        })
        .collect();

    Ok(YearSlider {
        value: max,
        min,
        max,
        marks,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorGrid {
    pub years: Vec<i32>,
    pub panels: Vec<IndicatorTraces>,
}

pub fn indicator_time_series(
    table: &WdiTable,
    indicators: &[String],
    regions: &[String],
) -> IndicatorGrid {
    IndicatorGrid {
        years: table.years().to_vec(),
        panels: table.indicator_over_regions(indicators, regions),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choropleth {
    pub year: i32,
    pub locations: Vec<String>,
    pub z: Vec<Option<f64>>,
}

pub fn choropleth(table: &WdiTable, indicator: &str, year: i32) -> DashResult<Choropleth> {
    let (locations, z): (Vec<String>, Vec<Option<f64>>) =
        table.choropleth(indicator, year)?.into_iter().unzip();
    Ok(Choropleth { year, locations, z })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub country: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingTable {
    pub indicator: String,
    pub year: i32,
    pub rows: Vec<RankingRow>,
}

pub fn ranking_table(table: &WdiTable, indicator: &str, year: i32) -> DashResult<RankingTable> {
    let rows = table
        .ranking(indicator, year)?
        .into_iter()
        .map(|(country, value)| RankingRow { country, value })
        .collect();
    Ok(RankingTable {
        indicator: indicator.to_string(),
        year,
        rows,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryOverTime {
    pub title: String,
    pub series: CountrySeries,
}

/// Country code under the pointer, e.g. `{"points": [{"location": "KWT"}]}`
pub fn hovered_country(hover: &Value) -> Option<&str> {
    hover
        .get("points")?
        .get(0)?
        .get("location")?
        .as_str()
}

pub fn country_over_time(
    table: &WdiTable,
    indicator: &str,
    hover: &Value,
) -> DashResult<CountryOverTime> {
    let code = hovered_country(hover).unwrap_or(DEFAULT_COUNTRY_CODE);
    let series = table.country_series(indicator, code)?;
    Ok(CountryOverTime {
        title: format!("{} over time in {}", indicator, series.country_name),
        series,
    })
}
