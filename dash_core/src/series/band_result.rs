use chrono::NaiveDateTime;
use serde::Serialize;

use crate::common::enums::BandLine;

/// Rolling mean with its upper and lower bands.
///
/// All three vectors have the length of the input series and line up with it
/// index for index. Entries are `None` before the window fills or wherever
/// the window holds a missing value. `timestamps` repeats the input series'
/// timestamps and is empty when the bands come from bare values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandResult {
    pub timestamps: Vec<NaiveDateTime>,
    pub mean: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BandResult {
    pub fn with_capacity(len: usize) -> Self {
        Self {
            timestamps: Vec::new(),
            mean: Vec::with_capacity(len),
            upper: Vec::with_capacity(len),
            lower: Vec::with_capacity(len),
        }
    }

    pub fn with_timestamps(mut self, timestamps: Vec<NaiveDateTime>) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn push(&mut self, point: Option<(f64, f64, f64)>) {
        match point {
            Some((mean, upper, lower)) => {
                self.mean.push(Some(mean));
                self.upper.push(Some(upper));
                self.lower.push(Some(lower));
            }
            None => {
                self.mean.push(None);
                self.upper.push(None);
                self.lower.push(None);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    pub fn line(&self, line: BandLine) -> &[Option<f64>] {
        match line {
            BandLine::Mean => &self.mean,
            BandLine::Upper => &self.upper,
            BandLine::Lower => &self.lower,
        }
    }

    /// Index of the first position where the bands are present
    pub fn first_present(&self) -> Option<usize> {
        self.mean.iter().position(Option::is_some)
    }

    pub fn present_count(&self) -> usize {
        self.mean.iter().filter(|v| v.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_lines_aligned() {
        let mut res = BandResult::with_capacity(2);
        res.push(None);
        res.push(Some((2.0, 3.0, 1.0)));
        assert_eq!(res.len(), 2);
        assert_eq!(res.line(BandLine::Upper), &[None, Some(3.0)]);
        assert_eq!(res.line(BandLine::Lower), &[None, Some(1.0)]);
        assert_eq!(res.first_present(), Some(1));
        assert_eq!(res.present_count(), 1);
    }
}
