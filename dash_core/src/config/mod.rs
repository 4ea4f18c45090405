pub mod band_config;

pub use band_config::{BandConfig, ConfigWithCheck};
