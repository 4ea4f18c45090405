pub mod boll;
pub mod rolling;

pub use boll::{compute, BollMetric, BollModel, RollingBandEstimator};
