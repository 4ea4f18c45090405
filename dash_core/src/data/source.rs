use crate::common::dash_exception::DashResult;
use crate::data::price_csv::PriceHistory;

/// A dataset with an explicit load/refresh lifecycle.
///
/// Nothing is read at construction time. `load` performs the first read and
/// `refresh` replaces whatever was cached with a fresh read.
pub trait DataSource {
    fn describe(&self) -> String;

    fn load(&mut self) -> DashResult<()>;

    fn refresh(&mut self) -> DashResult<()> {
        log::info!("refreshing {}", self.describe());
        self.load()
    }

    fn is_loaded(&self) -> bool;
}

/// Anything that can hand out the price history of a ticker
pub trait PriceProvider {
    fn history(&self, ticker: &str) -> DashResult<PriceHistory>;
}
