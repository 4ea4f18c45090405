pub mod graph;
pub mod store;

pub use graph::{Binding, ReactiveGraph};
pub use store::WidgetStore;
