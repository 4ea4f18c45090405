use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::common::dash_exception::{DashError, DashResult, ErrCode};
use crate::common::utils::normalize;

/// Ordered `(timestamp, value)` pairs with strictly increasing timestamps.
///
/// Values are `None` where the observation is missing. NaN and infinite
/// inputs are stored as `None`, so callers never see them coming back out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    name: Option<String>,
    timestamps: Vec<NaiveDateTime>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<Option<f64>>) -> DashResult<Self> {
        if timestamps.len() != values.len() {
            return Err(DashError::new(
                format!(
                    "timestamps ({}) and values ({}) must have the same length",
                    timestamps.len(),
                    values.len()
                ),
                ErrCode::LengthMismatch,
            ));
        }

        if let Some(pos) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(DashError::new(
                format!(
                    "timestamp {} at index {} is not after {}",
                    timestamps[pos + 1],
                    pos + 1,
                    timestamps[pos]
                ),
                ErrCode::SeriesNotMonotonous,
            ));
        }

        let values = values.into_iter().map(|v| v.and_then(normalize)).collect();
        Ok(Self {
            name: None,
            timestamps,
            values,
        })
    }

    /// Build from raw floats, NaN or infinity meaning missing
    pub fn from_f64(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> DashResult<Self> {
        Self::new(timestamps, values.into_iter().map(normalize).collect())
    }

    /// One value per calendar day starting at `start`
    pub fn daily(start: NaiveDate, values: Vec<Option<f64>>) -> Self {
        let timestamps = start
            .iter_days()
            .take(values.len())
            .map(|d| d.and_time(NaiveTime::MIN))
            .collect();
        Self {
            name: None,
            timestamps,
            values: values.into_iter().map(|v| v.and_then(normalize)).collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDateTime, Option<f64>)> + '_ {
        self.timestamps.iter().zip(self.values.iter().copied())
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Sub-series with `start <= t <= end`
    pub fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let lo = self.timestamps.partition_point(|t| *t < start);
        let hi = self.timestamps.partition_point(|t| *t <= end).max(lo);
        Self {
            name: self.name.clone(),
            timestamps: self.timestamps[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 6, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = TimeSeries::new(vec![day(1), day(2)], vec![Some(1.0)]).unwrap_err();
        assert_eq!(err.errcode, ErrCode::LengthMismatch);
    }

    #[test]
    fn test_new_rejects_non_increasing() {
        let err = TimeSeries::new(vec![day(1), day(1)], vec![Some(1.0), Some(2.0)]).unwrap_err();
        assert_eq!(err.errcode, ErrCode::SeriesNotMonotonous);

        let err = TimeSeries::new(vec![day(2), day(1)], vec![Some(1.0), Some(2.0)]).unwrap_err();
        assert_eq!(err.errcode, ErrCode::SeriesNotMonotonous);
    }

    #[test]
    fn test_nan_becomes_missing() {
        let ts = TimeSeries::from_f64(vec![day(1), day(2), day(3)], vec![f64::NAN, 3.0, f64::INFINITY])
            .unwrap();
        assert_eq!(ts.values(), &[None, Some(3.0), None]);
        assert_eq!(ts.missing_count(), 2);
    }

    #[test]
    fn test_daily() {
        let ts = TimeSeries::daily(day(1).date(), vec![Some(1.0), None, Some(3.0)]).with_name("aapl");
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.timestamps()[2], day(3));
        assert_eq!(ts.name(), Some("aapl"));
    }

    #[test]
    fn test_between_is_inclusive() {
        let ts = TimeSeries::daily(day(1).date(), (1..=10).map(|v| Some(v as f64)).collect());
        let sub = ts.between(day(3), day(5));
        assert_eq!(sub.values(), &[Some(3.0), Some(4.0), Some(5.0)]);

        let empty = ts.between(day(20), day(25));
        assert!(empty.is_empty());

        let reversed = ts.between(day(5), day(3));
        assert!(reversed.is_empty());
    }
}
