use std::collections::HashMap;

use serde_json::Value;

/// Current value of every widget, keyed by widget id
#[derive(Debug, Clone, Default)]
pub struct WidgetStore {
    values: HashMap<String, Value>,
}

impl WidgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    /// Returns whether the stored value changed
    pub fn set(&mut self, id: &str, value: Value) -> bool {
        match self.values.get(id) {
            Some(old) if *old == value => false,
            _ => {
                self.values.insert(id.to_string(), value);
                true
            }
        }
    }

    /// Values of `ids` in order, or `None` if any is unset
    pub fn gather(&self, ids: &[String]) -> Option<Vec<&Value>> {
        ids.iter().map(|id| self.values.get(id)).collect()
    }
}
