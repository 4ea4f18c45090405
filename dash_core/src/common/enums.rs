use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Divisor used for the rolling standard deviation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum StdConvention {
    /// Divide by `n - 1`
    #[default]
    Sample,
    /// Divide by `n`
    Population,
}

impl StdConvention {
    /// Delta degrees of freedom
    pub fn ddof(&self) -> usize {
        match self {
            StdConvention::Sample => 1,
            StdConvention::Population => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BandLine {
    Mean,
    Upper,
    Lower,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_std_convention_parse() {
        assert_eq!(StdConvention::from_str("sample").unwrap(), StdConvention::Sample);
        assert_eq!(
            StdConvention::from_str("Population").unwrap(),
            StdConvention::Population
        );
        assert!(StdConvention::from_str("biased").is_err());
        assert_eq!(StdConvention::default(), StdConvention::Sample);
    }

    #[test]
    fn test_ddof() {
        assert_eq!(StdConvention::Sample.ddof(), 1);
        assert_eq!(StdConvention::Population.ddof(), 0);
    }
}
