pub mod companies;
pub mod indicators;
pub mod price_csv;
pub mod source;
pub mod wdi;

use serde::{Deserialize, Serialize};

pub use companies::{Company, CompanyListSource};
pub use price_csv::{PriceBar, PriceCsvSource, PriceHistory};
pub use source::{DataSource, PriceProvider};
pub use wdi::{WdiSource, WdiTable};

/// Entry of a dropdown widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }

    pub fn header(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
            disabled: true,
        }
    }
}
