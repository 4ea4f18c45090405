//! Fixed-size rolling window statistics.
//!
//! Output position `i` looks at the `window` values ending at `i`. The first
//! `window - 1` positions have no full window and are `None`, and any window
//! that holds a missing value yields `None` rather than shrinking. NaN and
//! infinite values count as missing.

use crate::common::dash_exception::{DashError, DashResult};
use crate::common::enums::StdConvention;
use crate::common::utils::normalize;

pub(crate) fn check_window(window: usize) -> DashResult<()> {
    if window == 0 {
        return Err(DashError::invalid_argument(
            "window_size must be a positive integer",
        ));
    }
    Ok(())
}

/// Apply `agg` to every complete window of `values`
pub fn rolling_apply<T, F>(values: &[Option<f64>], window: usize, mut agg: F) -> DashResult<Vec<Option<T>>>
where
    F: FnMut(&[f64]) -> T,
{
    check_window(window)?;

    let mut out = Vec::with_capacity(values.len());
    let mut buf: Vec<f64> = Vec::with_capacity(window);
    for i in 0..values.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }
        buf.clear();
        let complete = values[i + 1 - window..=i].iter().all(|v| match v.and_then(normalize) {
            Some(x) => {
                buf.push(x);
                true
            }
            None => false,
        });
        out.push(if complete { Some(agg(&buf)) } else { None });
    }
    Ok(out)
}

pub fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Standard deviation of a complete window.
///
/// A single-element window has a deviation of `0` under either convention.
pub fn std_dev(window: &[f64], convention: StdConvention) -> f64 {
    let n = window.len();
    if n <= 1 {
        return 0.0;
    }
    let mid = mean(window);
    let sq = window.iter().map(|&x| (x - mid).powi(2)).sum::<f64>();
    (sq / (n - convention.ddof()) as f64).sqrt()
}

pub fn rolling_mean(values: &[Option<f64>], window: usize) -> DashResult<Vec<Option<f64>>> {
    rolling_apply(values, window, mean)
}

pub fn rolling_std(
    values: &[Option<f64>],
    window: usize,
    convention: StdConvention,
) -> DashResult<Vec<Option<f64>>> {
    rolling_apply(values, window, |w| std_dev(w, convention))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dash_exception::ErrCode;

    fn series(v: &[f64]) -> Vec<Option<f64>> {
        v.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_rolling_mean() {
        let out = rolling_mean(&series(&[1.0, 2.0, 3.0, 4.0]), 2).unwrap();
        assert_eq!(out, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_rolling_std_sample_and_population() {
        let vals = series(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let pop = rolling_std(&vals, 8, StdConvention::Population).unwrap();
        assert_eq!(pop[7], Some(2.0));

        let sample = rolling_std(&vals, 8, StdConvention::Sample).unwrap();
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample[7].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_missing_poisons_window() {
        let vals = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let out = rolling_mean(&vals, 2).unwrap();
        assert_eq!(out, vec![None, None, None, Some(3.5), Some(4.5)]);
    }

    #[test]
    fn test_non_finite_counts_as_missing() {
        let vals = vec![Some(1.0), Some(f64::NAN), Some(3.0), Some(f64::INFINITY), Some(5.0), Some(6.0)];
        let out = rolling_mean(&vals, 2).unwrap();
        assert_eq!(out, vec![None, None, None, None, None, Some(5.5)]);
    }

    #[test]
    fn test_window_longer_than_input() {
        let out = rolling_mean(&series(&[1.0, 2.0]), 5).unwrap();
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = rolling_mean(&series(&[1.0]), 0).unwrap_err();
        assert_eq!(err.errcode, ErrCode::InvalidArgument);
    }

    #[test]
    fn test_single_element_std_is_zero() {
        assert_eq!(std_dev(&[42.0], StdConvention::Sample), 0.0);
        assert_eq!(std_dev(&[42.0], StdConvention::Population), 0.0);
    }
}
