pub mod common;
pub mod config;
pub mod data;
pub mod math;
pub mod panels;
pub mod reactive;
pub mod series;

pub use common::dash_exception::{DashError, DashResult, ErrCode};
pub use config::band_config::BandConfig;
pub use math::boll::{compute, RollingBandEstimator};
pub use series::{BandResult, TimeSeries};
