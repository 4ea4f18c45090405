pub mod band_result;
pub mod time_series;

pub use band_result::BandResult;
pub use time_series::TimeSeries;
