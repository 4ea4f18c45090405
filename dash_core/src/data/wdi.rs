//! World Development Indicators table: one row per (country, indicator),
//! one column per year.

use std::cmp::Ordering;
use std::path::PathBuf;

use csv::StringRecord;
use log::info;
use serde::Serialize;

use super::source::DataSource;
use crate::common::dash_exception::{DashError, DashResult, ErrCode};
use crate::common::utils::{decode_latin1_fallback, parse_cell};

const COUNTRY_NAME: &str = "Country Name";
const COUNTRY_CODE: &str = "Country Code";
const INDICATOR_NAME: &str = "Indicator Name";
const INDICATOR_CODE: &str = "Indicator Code";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WdiRow {
    pub country_name: String,
    pub country_code: String,
    pub indicator_name: String,
    pub indicator_code: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTrace {
    pub region: String,
    /// One value per year, empty when the region has no row for the indicator
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorTraces {
    pub indicator: String,
    pub traces: Vec<RegionTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySeries {
    pub country_name: String,
    pub years: Vec<i32>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WdiTable {
    years: Vec<i32>,
    rows: Vec<WdiRow>,
}

impl WdiTable {
    pub fn from_csv_str(text: &str) -> DashResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = rdr.headers()?.clone();

        let col = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| {
                    DashError::new(
                        format!("indicator csv is missing the {:?} column", name),
                        ErrCode::SrcDataFormatError,
                    )
                })
        };
        let (name_idx, code_idx) = (col(COUNTRY_NAME)?, col(COUNTRY_CODE)?);
        let (ind_idx, ind_code_idx) = (col(INDICATOR_NAME)?, col(INDICATOR_CODE)?);

        let year_cols: Vec<(usize, i32)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.trim().parse::<i32>().ok().map(|y| (i, y)))
            .collect();
        if year_cols.is_empty() {
            return Err(DashError::new(
                "indicator csv has no year columns",
                ErrCode::SrcDataFormatError,
            ));
        }

        let mut rows = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record: StringRecord = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

            let mut values = Vec::with_capacity(year_cols.len());
            for &(idx, year) in &year_cols {
                let raw = record.get(idx).unwrap_or("");
                let v = parse_cell(raw).map_err(|e| {
                    DashError::new(
                        format!("row {} year {}: bad number {:?}: {}", line + 2, year, raw, e),
                        ErrCode::SrcDataFormatError,
                    )
                })?;
                values.push(v);
            }

            rows.push(WdiRow {
                country_name: field(name_idx),
                country_code: field(code_idx),
                indicator_name: field(ind_idx),
                indicator_code: field(ind_code_idx),
                values,
            });
        }

        Ok(Self {
            years: year_cols.into_iter().map(|(_, y)| y).collect(),
            rows,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> DashResult<Self> {
        Self::from_csv_str(&decode_latin1_fallback(bytes))
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn rows(&self) -> &[WdiRow] {
        &self.rows
    }

    fn year_index(&self, year: i32) -> DashResult<usize> {
        self.years.iter().position(|&y| y == year).ok_or_else(|| {
            DashError::new(format!("no column for year {}", year), ErrCode::NoData)
        })
    }

    fn rows_for<'a>(&'a self, indicator: &'a str) -> impl Iterator<Item = &'a WdiRow> + 'a {
        self.rows.iter().filter(move |r| r.indicator_name == indicator)
    }

    /// Unique country names, in file order
    pub fn regions(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.country_name) {
                seen.push(row.country_name.clone());
            }
        }
        seen
    }

    pub fn indicator_over_regions(
        &self,
        indicators: &[String],
        regions: &[String],
    ) -> Vec<IndicatorTraces> {
        indicators
            .iter()
            .map(|indicator| IndicatorTraces {
                indicator: indicator.clone(),
                traces: regions
                    .iter()
                    .map(|region| RegionTrace {
                        region: region.clone(),
                        values: self
                            .rows_for(indicator)
                            .find(|r| &r.country_name == region)
                            .map(|r| r.values.clone())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Years where at least one country has a value for `indicator`
    pub fn available_years(&self, indicator: &str) -> Vec<i32> {
        self.years
            .iter()
            .enumerate()
            .filter(|(i, _)| self.rows_for(indicator).any(|r| r.values[*i].is_some()))
            .map(|(_, &y)| y)
            .collect()
    }

    /// `(country, value)` pairs of one year, in file order
    pub fn choropleth(&self, indicator: &str, year: i32) -> DashResult<Vec<(String, Option<f64>)>> {
        let idx = self.year_index(year)?;
        Ok(self
            .rows_for(indicator)
            .map(|r| (r.country_name.clone(), r.values[idx]))
            .collect())
    }

    /// Same as [`choropleth`](Self::choropleth) but sorted by value, highest
    /// first, with missing values last
    pub fn ranking(&self, indicator: &str, year: i32) -> DashResult<Vec<(String, Option<f64>)>> {
        let mut rows = self.choropleth(indicator, year)?;
        rows.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(rows)
    }

    pub fn country_series(&self, indicator: &str, country_code: &str) -> DashResult<CountrySeries> {
        let row = self
            .rows_for(indicator)
            .find(|r| r.country_code == country_code)
            .ok_or_else(|| {
                DashError::new(
                    format!("no {:?} data for country {}", indicator, country_code),
                    ErrCode::NoData,
                )
            })?;
        Ok(CountrySeries {
            country_name: row.country_name.clone(),
            years: self.years.clone(),
            values: row.values.clone(),
        })
    }
}

/// World Bank indicator CSV file
#[derive(Debug)]
pub struct WdiSource {
    path: PathBuf,
    table: Option<WdiTable>,
}

impl WdiSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: None,
        }
    }

    pub fn table(&self) -> DashResult<&WdiTable> {
        self.table.as_ref().ok_or_else(|| {
            DashError::new(format!("{} is not loaded", self.describe()), ErrCode::NoData)
        })
    }
}

impl DataSource for WdiSource {
    fn describe(&self) -> String {
        format!("indicator file {}", self.path.display())
    }

    fn load(&mut self) -> DashResult<()> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            DashError::new(
                format!("cannot read {}: {}", self.path.display(), e),
                ErrCode::SrcDataNotFound,
            )
        })?;
        let table = WdiTable::from_bytes(&bytes)?;
        info!(
            "loaded {} indicator rows over {} years from {:?}",
            table.rows.len(),
            table.years.len(),
            self.path
        );
        self.table = Some(table);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.table.is_some()
    }
}
