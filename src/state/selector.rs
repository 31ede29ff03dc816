//! Identity-type picker and the void confirmation form.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

use crate::dom::ElementData;

/// Identity document type picker; drives which id-number fields are shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdTypeSelector {
    pub id_type: String,
}

impl IdTypeSelector {
    /// Take the bound element's current value (empty when it has none).
    pub fn init_from_element(&mut self, el: &ElementData) {
        self.id_type = el.value.clone().unwrap_or_default();
    }

    pub fn update_from_event(&mut self, value: &str) {
        value.clone_into(&mut self.id_type);
    }
}

/// Void-transaction confirmation form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoidForm {
    pub void_reason: String,
    pub confirm_void: bool,
}

impl VoidForm {
    pub fn update_reason(&mut self, value: &str) {
        value.clone_into(&mut self.void_reason);
    }

    pub fn set_confirm(&mut self, checked: bool) {
        self.confirm_void = checked;
    }
}
