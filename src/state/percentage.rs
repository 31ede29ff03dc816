//! Fixed-amount or percentage switch for salary components.

#[cfg(test)]
#[path = "percentage_test.rs"]
mod percentage_test;

use crate::dom::ElementData;

/// Dataset key holding the initial mode (`data-initial-percentage`).
pub const INITIAL_PERCENTAGE_ATTR: &str = "initialPercentage";

/// Fixed-amount vs percentage switch on the salary component form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PercentageToggle {
    pub is_percentage: bool,
}

impl PercentageToggle {
    /// Only the exact string `"true"` selects percentage mode.
    pub fn from_element(el: &ElementData) -> Self {
        Self { is_percentage: el.data(INITIAL_PERCENTAGE_ATTR) == Some("true") }
    }

    pub fn set_fixed(&mut self) {
        self.is_percentage = false;
    }

    pub fn set_percentage(&mut self) {
        self.is_percentage = true;
    }
}
