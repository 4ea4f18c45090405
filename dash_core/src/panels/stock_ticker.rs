use serde::Serialize;

use crate::common::dash_exception::DashResult;
use crate::common::enums::BandLine;
use crate::common::time::to_str;
use crate::config::BandConfig;
use crate::data::source::PriceProvider;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candlestick {
    pub dates: Vec<String>,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTrace {
    pub name: String,
    pub line: BandLine,
    pub show_legend: bool,
    pub values: Vec<Option<f64>>,
}

/// Candlestick of one ticker with its three band lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerFigure {
    pub ticker: String,
    pub candlestick: Candlestick,
    pub bands: Vec<BandTrace>,
}

pub fn ticker_figure(
    provider: &dyn PriceProvider,
    ticker: &str,
    config: &BandConfig,
) -> DashResult<TickerFigure> {
    let history = provider.history(ticker)?.between(config.start, config.end);
    let closes = history.close_series()?;
    let bands = config.estimator().compute(&closes)?;

    let candlestick = Candlestick {
        dates: history.bars.iter().map(|b| to_str(&b.date)).collect(),
        open: history.bars.iter().map(|b| b.open).collect(),
        high: history.bars.iter().map(|b| b.high).collect(),
        low: history.bars.iter().map(|b| b.low).collect(),
        close: closes.values().to_vec(),
    };

    let name = format!("{} - bollinger bands", ticker);
    let bands = [BandLine::Mean, BandLine::Upper, BandLine::Lower]
        .into_iter()
        .map(|line| BandTrace {
            name: name.clone(),
            line,
            show_legend: line == BandLine::Mean,
            values: bands.line(line).to_vec(),
        })
        .collect();

    Ok(TickerFigure {
        ticker: ticker.to_string(),
        candlestick,
        bands,
    })
}

pub fn ticker_figures(
    provider: &dyn PriceProvider,
    tickers: &[String],
    config: &BandConfig,
) -> DashResult<Vec<TickerFigure>> {
    tickers
        .iter()
        .map(|t| ticker_figure(provider, t, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dash_exception::{DashError, ErrCode};
    use crate::data::price_csv::PriceHistory;

    struct FixedPrices;

    impl PriceProvider for FixedPrices {
        fn history(&self, ticker: &str) -> DashResult<PriceHistory> {
            if ticker != "yhoo" {
                return Err(DashError::new("unknown", ErrCode::NoData));
            }
            let mut csv = String::from("Date,Open,High,Low,Close\n");
            for d in 1..=12 {
                let c = 30.0 + d as f64;
                csv.push_str(&format!("2016-06-{:02},{},{},{},{}\n", d, c - 0.5, c + 1.0, c - 1.0, c));
            }
            csv.push_str("2017-02-15 16:00:00,40,41,39,40\n");
            csv.push_str("2018-01-02,1,1,1,1\n");
            PriceHistory::from_reader(ticker, csv.as_bytes())
        }
    }

    #[test]
    fn test_ticker_figure() {
        let config = BandConfig {
            window_size: 3,
            num_std: 1.0,
            ..BandConfig::default()
        };
        let fig = ticker_figure(&FixedPrices, "yhoo", &config).unwrap();
        // the 2018 bar is outside the default date range, the afternoon bar
        // on the last day is inside it
        assert_eq!(fig.candlestick.dates.len(), 13);
        assert_eq!(fig.candlestick.dates[0], "2016-06-01");
        assert_eq!(fig.candlestick.dates[12], "2017-02-15 16:00:00");
        assert_eq!(fig.bands.len(), 3);
        assert!(fig.bands[0].show_legend);
        assert!(!fig.bands[1].show_legend);

        let mean = &fig.bands[0].values;
        assert_eq!(mean[1], None);
        assert_eq!(mean[2], Some(32.0));
        assert_eq!(fig.bands[1].values[2], Some(33.0));
        assert_eq!(fig.bands[2].values[2], Some(31.0));
    }

    #[test]
    fn test_unknown_ticker() {
        let err = ticker_figures(&FixedPrices, &["yhoo".into(), "zzz".into()], &BandConfig::default())
            .unwrap_err();
        assert_eq!(err.errcode, ErrCode::NoData);
    }
}
