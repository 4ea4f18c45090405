//! Bollinger bands: a rolling mean with bands `num_std` standard deviations
//! above and below it.
//!
//! The deviation is the sample standard deviation (divisor `window_size - 1`)
//! unless [`StdConvention::Population`] is selected. A window of one value has
//! a deviation of `0`, so its bands collapse onto the value.

use std::collections::VecDeque;

use log::debug;
use serde::Serialize;

use super::rolling::{self, check_window};
use crate::common::dash_exception::{DashError, DashResult};
use crate::common::enums::StdConvention;
use crate::common::utils::normalize;
use crate::series::{BandResult, TimeSeries};

pub const DEFAULT_WINDOW_SIZE: usize = 10;
pub const DEFAULT_NUM_STD: f64 = 5.0;

fn check_num_std(num_std: f64) -> DashResult<()> {
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(DashError::invalid_argument(format!(
            "num_std must be a finite non-negative number, got {}",
            num_std
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollMetric {
    pub up: f64,
    pub mid: f64,
    pub down: f64,
}

impl BollMetric {
    fn from_window(window: &[f64], k: f64, convention: StdConvention) -> Self {
        let mid = rolling::mean(window);
        let std_dev = rolling::std_dev(window, convention);
        Self {
            up: mid + k * std_dev,
            mid,
            down: mid - k * std_dev,
        }
    }
}

/// Stateless batch estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingBandEstimator {
    pub window_size: usize,
    pub num_std: f64,
    pub convention: StdConvention,
}

impl Default for RollingBandEstimator {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            num_std: DEFAULT_NUM_STD,
            convention: StdConvention::Sample,
        }
    }
}

impl RollingBandEstimator {
    pub fn new(window_size: usize, num_std: f64) -> DashResult<Self> {
        let est = Self {
            window_size,
            num_std,
            convention: StdConvention::Sample,
        };
        est.validate()?;
        Ok(est)
    }

    pub fn with_convention(mut self, convention: StdConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn validate(&self) -> DashResult<()> {
        check_window(self.window_size)?;
        check_num_std(self.num_std)
    }

    pub fn compute(&self, series: &TimeSeries) -> DashResult<BandResult> {
        debug!(
            "computing bands for {} ({} points, window={}, num_std={}, {})",
            series.name().unwrap_or("<unnamed>"),
            series.len(),
            self.window_size,
            self.num_std,
            self.convention
        );
        Ok(self
            .compute_values(series.values())?
            .with_timestamps(series.timestamps().to_vec()))
    }

    /// Same computation as [`Self::compute`] over bare values, without timestamps
    pub fn compute_values(&self, values: &[Option<f64>]) -> DashResult<BandResult> {
        self.validate()?;
        let (k, convention) = (self.num_std, self.convention);
        let metrics = rolling::rolling_apply(values, self.window_size, |w| {
            BollMetric::from_window(w, k, convention)
        })?;

        let mut res = BandResult::with_capacity(values.len());
        for m in metrics {
            res.push(m.map(|m| (m.mid, m.up, m.down)));
        }
        Ok(res)
    }
}

/// Bands for `series` with a sample standard deviation
pub fn compute(series: &TimeSeries, window_size: usize, num_std: f64) -> DashResult<BandResult> {
    RollingBandEstimator::new(window_size, num_std)?.compute(series)
}

/// Incremental form of [`RollingBandEstimator`]: feeding a series one point
/// at a time gives the same numbers as the batch computation.
#[derive(Debug, Clone)]
pub struct BollModel {
    period: usize,
    k: f64,
    convention: StdConvention,
    prices: VecDeque<Option<f64>>,
}

impl BollModel {
    pub fn new(period: usize, k: f64) -> DashResult<Self> {
        check_window(period)?;
        check_num_std(k)?;
        Ok(Self {
            period,
            k,
            convention: StdConvention::Sample,
            prices: VecDeque::with_capacity(period),
        })
    }

    pub fn with_convention(mut self, convention: StdConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn add(&mut self, price: Option<f64>) -> Option<BollMetric> {
        self.prices.push_back(price.and_then(normalize));
        if self.prices.len() > self.period {
            self.prices.pop_front();
        }
        if self.prices.len() < self.period {
            return None;
        }

        let window: Option<Vec<f64>> = self.prices.iter().copied().collect();
        window.map(|w| BollMetric::from_window(&w, self.k, self.convention))
    }

    pub fn reset(&mut self) {
        self.prices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dash_exception::ErrCode;
    use chrono::NaiveDate;

    fn series(vals: &[Option<f64>]) -> TimeSeries {
        TimeSeries::daily(NaiveDate::from_ymd_opt(2016, 6, 1).unwrap(), vals.to_vec())
    }

    fn one_to_ten() -> TimeSeries {
        series(&(1..=10).map(|v| Some(v as f64)).collect::<Vec<_>>())
    }

    #[test]
    fn test_reference_example() {
        let res = compute(&one_to_ten(), 3, 1.0).unwrap();
        assert_eq!(res.mean[2], Some(2.0));
        assert_eq!(res.upper[2], Some(3.0));
        assert_eq!(res.lower[2], Some(1.0));
        assert_eq!(res.mean[0], None);
        assert_eq!(res.mean[1], None);
    }

    #[test]
    fn test_result_carries_timestamps() {
        let ts = one_to_ten();
        let res = compute(&ts, 3, 1.0).unwrap();
        assert_eq!(res.timestamps, ts.timestamps());
        assert_eq!(res.timestamps.len(), res.len());
    }

    #[test]
    fn test_compute_values_matches_compute() {
        let vals = vec![Some(4.0), Some(2.0), None, Some(7.0), Some(5.0), Some(6.0), Some(3.0)];
        let est = RollingBandEstimator::new(3, 1.5).unwrap();
        let from_series = est.compute(&series(&vals)).unwrap();
        let from_values = est.compute_values(&vals).unwrap();
        assert!(from_values.timestamps.is_empty());
        assert_eq!(from_values.mean, from_series.mean);
        assert_eq!(from_values.upper, from_series.upper);
        assert_eq!(from_values.lower, from_series.lower);
        assert_eq!(from_values.first_present(), Some(5));
    }

    #[test]
    fn test_compute_values_treats_nan_as_missing() {
        let est = RollingBandEstimator::new(2, 1.0).unwrap();
        let res = est.compute_values(&[Some(1.0), Some(f64::NAN), Some(3.0)]).unwrap();
        assert_eq!(res.mean, vec![None, None, None]);
        assert_eq!(res.upper, vec![None, None, None]);
        assert_eq!(res.lower, vec![None, None, None]);
    }

    #[test]
    fn test_infinite_input_is_missing() {
        let est = RollingBandEstimator::new(2, 1.0).unwrap();
        let res = est
            .compute_values(&[Some(1.0), Some(f64::INFINITY), Some(3.0), Some(5.0)])
            .unwrap();
        assert_eq!(res.mean, vec![None, None, None, Some(4.0)]);
        for i in 0..res.len() {
            if let (Some(u), Some(m), Some(l)) = (res.upper[i], res.mean[i], res.lower[i]) {
                assert!(u >= m && m >= l);
            }
        }

        let mut model = BollModel::new(2, 1.0).unwrap();
        model.add(Some(1.0));
        assert!(model.add(Some(f64::NEG_INFINITY)).is_none());
    }

    #[test]
    fn test_defaults() {
        let est = RollingBandEstimator::default();
        assert_eq!(est.window_size, 10);
        assert_eq!(est.num_std, 5.0);
        assert_eq!(est.convention, StdConvention::Sample);

        let res = est.compute(&one_to_ten()).unwrap();
        assert_eq!(res.first_present(), Some(9));
        assert_eq!(res.mean[9], Some(5.5));
    }

    #[test]
    fn test_invalid_arguments() {
        let ts = one_to_ten();
        for (w, k) in [(0, 1.0), (3, -0.5), (3, f64::NAN), (3, f64::INFINITY)] {
            let err = compute(&ts, w, k).unwrap_err();
            assert_eq!(err.errcode, ErrCode::InvalidArgument, "w={} k={}", w, k);
        }
        assert!(BollModel::new(0, 2.0).is_err());
        assert!(BollModel::new(5, -1.0).is_err());
    }

    #[test]
    fn test_window_one_collapses() {
        let res = compute(&one_to_ten(), 1, 3.0).unwrap();
        for i in 0..10 {
            let v = Some((i + 1) as f64);
            assert_eq!(res.mean[i], v);
            assert_eq!(res.upper[i], v);
            assert_eq!(res.lower[i], v);
        }
    }

    #[test]
    fn test_population_is_narrower() {
        let ts = series(&[Some(1.0), Some(4.0), Some(2.0), Some(8.0)]);
        let sample = compute(&ts, 4, 2.0).unwrap();
        let pop = RollingBandEstimator::new(4, 2.0)
            .unwrap()
            .with_convention(StdConvention::Population)
            .compute(&ts)
            .unwrap();
        assert_eq!(sample.mean[3], pop.mean[3]);
        assert!(pop.upper[3].unwrap() < sample.upper[3].unwrap());
        assert!(pop.lower[3].unwrap() > sample.lower[3].unwrap());
    }

    #[test]
    fn test_streaming_matches_batch() {
        let vals = vec![
            Some(10.0),
            Some(10.5),
            Some(9.8),
            None,
            Some(11.2),
            Some(11.0),
            Some(10.4),
            Some(12.1),
            Some(12.0),
            Some(11.7),
        ];
        let batch = compute(&series(&vals), 3, 2.0).unwrap();
        let mut model = BollModel::new(3, 2.0).unwrap();
        for (i, v) in vals.iter().enumerate() {
            let m = model.add(*v);
            assert_eq!(m.map(|m| m.mid), batch.mean[i], "index {}", i);
            assert_eq!(m.map(|m| m.up), batch.upper[i], "index {}", i);
            assert_eq!(m.map(|m| m.down), batch.lower[i], "index {}", i);
        }
    }

    #[test]
    fn test_streaming_reset() {
        let mut model = BollModel::new(2, 1.0).unwrap();
        model.add(Some(1.0));
        assert!(model.add(Some(3.0)).is_some());
        model.reset();
        assert!(model.add(Some(5.0)).is_none());
    }
}
