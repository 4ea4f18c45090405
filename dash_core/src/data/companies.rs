use std::io::Read;
use std::path::PathBuf;

use log::info;
use serde::Deserialize;

use super::source::DataSource;
use super::DropdownOption;
use crate::common::dash_exception::{DashError, DashResult, ErrCode};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Company {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Name")]
    pub name: String,
}

pub fn read_companies<R: Read>(reader: R) -> DashResult<Vec<Company>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut companies = Vec::new();
    for result in rdr.deserialize() {
        let company: Company = result?;
        companies.push(company);
    }
    Ok(companies)
}

/// Company list CSV (`Symbol`, `Name`, any other columns ignored)
#[derive(Debug)]
pub struct CompanyListSource {
    path: PathBuf,
    companies: Option<Vec<Company>>,
}

impl CompanyListSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            companies: None,
        }
    }

    pub fn companies(&self) -> DashResult<&[Company]> {
        self.companies.as_deref().ok_or_else(|| {
            DashError::new(format!("{} is not loaded", self.describe()), ErrCode::NoData)
        })
    }

    /// Lower-cased ticker symbols
    pub fn tickers(&self) -> DashResult<Vec<String>> {
        Ok(self
            .companies()?
            .iter()
            .map(|c| c.symbol.to_lowercase())
            .collect())
    }

    pub fn options(&self) -> DashResult<Vec<DropdownOption>> {
        Ok(self
            .companies()?
            .iter()
            .map(|c| DropdownOption::new(c.name.clone(), c.symbol.clone()))
            .collect())
    }
}

impl DataSource for CompanyListSource {
    fn describe(&self) -> String {
        format!("company list {}", self.path.display())
    }

    fn load(&mut self) -> DashResult<()> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            DashError::new(
                format!("cannot open {}: {}", self.path.display(), e),
                ErrCode::SrcDataNotFound,
            )
        })?;
        let companies = read_companies(file)?;
        info!("loaded {} companies from {:?}", companies.len(), self.path);
        self.companies = Some(companies);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.companies.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Symbol,Name,Sector
AAPL,Apple Inc.,Technology
YHOO,Yahoo! Inc.,Technology
";

    #[test]
    fn test_read_companies() {
        let companies = read_companies(CSV.as_bytes()).unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[1].name, "Yahoo! Inc.");
    }

    #[test]
    fn test_missing_symbol_column() {
        let err = read_companies("Ticker,Name\nAAPL,Apple\n".as_bytes()).unwrap_err();
        assert_eq!(err.errcode, ErrCode::SrcDataFormatError);
    }

    #[test]
    fn test_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companylist.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut src = CompanyListSource::new(&path);
        assert!(src.tickers().is_err());
        src.load().unwrap();
        assert_eq!(src.tickers().unwrap(), vec!["aapl", "yhoo"]);

        let opts = src.options().unwrap();
        assert_eq!(opts[0], DropdownOption::new("Apple Inc.", "AAPL"));
    }
}
