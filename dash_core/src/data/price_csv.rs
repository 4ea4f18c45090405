use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use log::{info, warn};
use serde::Serialize;

use super::source::{DataSource, PriceProvider};
use crate::common::dash_exception::{DashError, DashResult, ErrCode};
use crate::common::time::parse_datetime;
use crate::common::utils::parse_cell;
use crate::series::TimeSeries;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    pub date: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// Daily OHLCV bars of one ticker, sorted by date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceHistory {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> DashResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                DashError::new(
                    format!("price csv is missing the {} column", name),
                    ErrCode::SrcDataFormatError,
                )
            })
        };

        Ok(Self {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }
}

impl PriceHistory {
    pub fn from_reader<R: Read>(ticker: &str, reader: R) -> DashResult<Self> {
        let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let cols = Columns::from_headers(rdr.headers()?)?;

        let mut bars = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result?;
            let date_cell = record.get(cols.date).unwrap_or("");
            if date_cell.is_empty() {
                warn!("{}: skipping row {} without a date", ticker, line + 2);
                continue;
            }

            let cell = |idx: usize| -> DashResult<Option<f64>> {
                let raw = record.get(idx).unwrap_or("");
                parse_cell(raw).map_err(|e| {
                    DashError::new(
                        format!("{}: row {}: bad number {:?}: {}", ticker, line + 2, raw, e),
                        ErrCode::SrcDataFormatError,
                    )
                })
            };

            bars.push(PriceBar {
                date: parse_datetime(date_cell)?,
                open: cell(cols.open)?,
                high: cell(cols.high)?,
                low: cell(cols.low)?,
                close: cell(cols.close)?,
                volume: match cols.volume {
                    Some(idx) => cell(idx)?,
                    None => None,
                },
            });
        }

        bars.sort_by_key(|b| b.date);
        if let Some(w) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DashError::new(
                format!("{}: duplicate date {}", ticker, w[0].date),
                ErrCode::SrcDataFormatError,
            ));
        }

        Ok(Self {
            ticker: ticker.to_string(),
            bars,
        })
    }

    pub fn from_path(ticker: &str, path: &Path) -> DashResult<Self> {
        let file = File::open(path).map_err(|e| {
            DashError::new(
                format!("cannot open {}: {}", path.display(), e),
                ErrCode::SrcDataNotFound,
            )
        })?;
        Self::from_reader(ticker, file)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars dated from `start` through `end`, whatever their time of day
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: self.ticker.clone(),
            bars: self
                .bars
                .iter()
                .filter(|b| (start..=end).contains(&b.date.date()))
                .cloned()
                .collect(),
        }
    }

    pub fn dates(&self) -> Vec<NaiveDateTime> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn close_series(&self) -> DashResult<TimeSeries> {
        let values = self.bars.iter().map(|b| b.close).collect();
        Ok(TimeSeries::new(self.dates(), values)?.with_name(self.ticker.clone()))
    }
}

/// Directory of `<TICKER>.csv` price files
#[derive(Debug)]
pub struct PriceCsvSource {
    dir: PathBuf,
    histories: Option<HashMap<String, PriceHistory>>,
}

impl PriceCsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            histories: None,
        }
    }

    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self
            .histories
            .as_ref()
            .map(|h| h.keys().cloned().collect())
            .unwrap_or_default();
        tickers.sort();
        tickers
    }
}

impl DataSource for PriceCsvSource {
    fn describe(&self) -> String {
        format!("price directory {}", self.dir.display())
    }

    fn load(&mut self) -> DashResult<()> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            DashError::new(
                format!("cannot read {}: {}", self.dir.display(), e),
                ErrCode::SrcDataNotFound,
            )
        })?;

        let mut histories = HashMap::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("csv") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let ticker = stem.to_lowercase();
            let history = PriceHistory::from_path(&ticker, &path)?;
            info!("loaded {} bars for {} from {:?}", history.len(), ticker, path);
            histories.insert(ticker, history);
        }

        self.histories = Some(histories);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.histories.is_some()
    }
}

impl PriceProvider for PriceCsvSource {
    fn history(&self, ticker: &str) -> DashResult<PriceHistory> {
        let histories = self.histories.as_ref().ok_or_else(|| {
            DashError::new(format!("{} is not loaded", self.describe()), ErrCode::NoData)
        })?;
        histories
            .get(&ticker.to_lowercase())
            .cloned()
            .ok_or_else(|| DashError::new(format!("no price data for {}", ticker), ErrCode::NoData))
    }
}
