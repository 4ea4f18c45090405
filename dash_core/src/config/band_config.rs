use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::dash_exception::{DashError, DashResult, ErrCode};
use crate::common::enums::StdConvention;
use crate::math::boll::{RollingBandEstimator, DEFAULT_NUM_STD, DEFAULT_WINDOW_SIZE};

/// Key/value parameters that must all be consumed.
///
/// Every `get` takes the key out; whatever remains at `check` time was not
/// recognised by anyone and is reported.
#[derive(Debug, Default)]
pub struct ConfigWithCheck {
    conf: HashMap<String, Value>,
}

impl ConfigWithCheck {
    pub fn new(conf: HashMap<String, Value>) -> Self {
        Self { conf }
    }

    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> DashResult<Option<T>> {
        match self.conf.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => serde_json::from_value(v.clone()).map(Some).map_err(|e| {
                DashError::new(
                    format!("bad value for {} = {}: {}", key, v, e),
                    ErrCode::ConfigError,
                )
            }),
        }
    }

    pub fn check(&self) -> DashResult<()> {
        let mut unknown: Vec<&str> = self.conf.keys().map(String::as_str).collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort_unstable();
        Err(DashError::new(
            format!("unknown para = {}", unknown.join(", ")),
            ErrCode::ParaError,
        ))
    }
}

/// Parameters of the band overlay and the price window it is drawn over
#[derive(Debug, Clone, PartialEq)]
pub struct BandConfig {
    pub window_size: usize,
    pub num_std: f64,
    pub std_convention: StdConvention,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            num_std: DEFAULT_NUM_STD,
            std_convention: StdConvention::Sample,
            start: default_start(),
            end: default_end(),
        }
    }
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 6, 1).unwrap_or_default()
}

fn default_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 2, 15).unwrap_or_default()
}

impl BandConfig {
    pub fn new(conf: Option<HashMap<String, Value>>) -> DashResult<Self> {
        let mut conf = ConfigWithCheck::new(conf.unwrap_or_default());
        let d = Self::default();

        let config = Self {
            window_size: conf.get("window_size")?.unwrap_or(d.window_size),
            num_std: conf.get("num_std")?.unwrap_or(d.num_std),
            std_convention: conf.get("std_convention")?.unwrap_or(d.std_convention),
            start: conf.get("start")?.unwrap_or(d.start),
            end: conf.get("end")?.unwrap_or(d.end),
        };
        conf.check()?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_json_str(s: &str) -> DashResult<Self> {
        let conf: HashMap<String, Value> = serde_json::from_str(s)?;
        Self::new(Some(conf))
    }

    pub fn from_json_file(path: &Path) -> DashResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> DashResult<()> {
        self.estimator().validate()?;
        if self.start > self.end {
            return Err(DashError::new(
                format!("start {} is after end {}", self.start, self.end),
                ErrCode::ConfigError,
            ));
        }
        Ok(())
    }

    pub fn estimator(&self) -> RollingBandEstimator {
        RollingBandEstimator {
            window_size: self.window_size,
            num_std: self.num_std,
            convention: self.std_convention,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conf(v: Value) -> Option<HashMap<String, Value>> {
        Some(serde_json::from_value(v).unwrap())
    }

    #[test]
    fn test_defaults() {
        let c = BandConfig::new(None).unwrap();
        assert_eq!(c, BandConfig::default());
        assert_eq!(c.window_size, 10);
        assert_eq!(c.num_std, 5.0);
        assert_eq!(c.start, NaiveDate::from_ymd_opt(2016, 6, 1).unwrap());
    }

    #[test]
    fn test_overrides() {
        let c = BandConfig::new(conf(json!({
            "window_size": 20,
            "num_std": 2,
            "std_convention": "population",
            "end": "2016-12-31",
        })))
        .unwrap();
        assert_eq!(c.window_size, 20);
        assert_eq!(c.num_std, 2.0);
        assert_eq!(c.std_convention, StdConvention::Population);
        assert_eq!(c.end, NaiveDate::from_ymd_opt(2016, 12, 31).unwrap());
    }

    #[test]
    fn test_unknown_key() {
        let err = BandConfig::new(conf(json!({"windowsize": 3}))).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ParaError);
        assert!(err.msg.contains("windowsize"));
    }

    #[test]
    fn test_bad_type() {
        let err = BandConfig::new(conf(json!({"window_size": "ten"}))).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);
    }

    #[test]
    fn test_invalid_values() {
        let err = BandConfig::new(conf(json!({"window_size": 0}))).unwrap_err();
        assert_eq!(err.errcode, ErrCode::InvalidArgument);

        let err = BandConfig::new(conf(json!({"num_std": -1.0}))).unwrap_err();
        assert_eq!(err.errcode, ErrCode::InvalidArgument);

        let err = BandConfig::new(conf(json!({"start": "2018-01-01"}))).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);
    }

    #[test]
    fn test_from_json_str() {
        let c = BandConfig::from_json_str(r#"{"window_size": 5}"#).unwrap();
        assert_eq!(c.estimator().window_size, 5);
        assert!(BandConfig::from_json_str("not json").is_err());
    }
}
