//! Full transaction entry form (template execution page).
//!
//! The amount input shows a grouped value while the record keeps the raw
//! integer; every edit re-renders the input and notifies the journal
//! preview through `amount-changed`.

#[cfg(test)]
#[path = "transaction_form_test.rs"]
mod transaction_form_test;

use crate::dom::{ElementData, EventSink, InputField, UiEvent};
use crate::format;

pub const AMOUNT_ATTR: &str = "amount";
pub const DESCRIPTION_ATTR: &str = "description";

pub const SAVE_DRAFT_LABEL: &str = "Simpan Draft";
pub const SAVING_LABEL: &str = "Menyimpan...";
pub const SAVE_AND_POST_LABEL: &str = "Simpan & Posting";
pub const POSTING_LABEL: &str = "Memproses...";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub amount: u64,
    pub description: String,
    pub submitting: bool,
}

/// Values the binding layer writes into the `#amount` and `#description`
/// inputs after mounting. `None` leaves the input as rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitialInputs {
    pub amount: Option<String>,
    pub description: Option<String>,
}

impl TransactionForm {
    /// Restore from `data-amount` / `data-description` on the form element.
    pub fn from_element(el: &ElementData) -> Self {
        Self {
            amount: el.data(AMOUNT_ATTR).map_or(0, format::parse_leading_amount),
            description: el.data(DESCRIPTION_ATTR).unwrap_or_default().to_owned(),
            submitting: false,
        }
    }

    pub fn initial_inputs(&self) -> InitialInputs {
        InitialInputs {
            amount: (self.amount > 0).then(|| format::format_amount(self.amount)),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
        }
    }

    pub fn formatted_amount(&self) -> String {
        format::format_amount(self.amount)
    }

    pub fn not_submitting(&self) -> bool {
        !self.submitting
    }

    pub fn submit_button_text(&self) -> &'static str {
        if self.submitting { SAVING_LABEL } else { SAVE_DRAFT_LABEL }
    }

    pub fn submit_post_button_text(&self) -> &'static str {
        if self.submitting { POSTING_LABEL } else { SAVE_AND_POST_LABEL }
    }

    pub fn update_amount(&mut self, field: &mut (impl InputField + ?Sized), events: &(impl EventSink + ?Sized)) {
        self.amount = format::parse_amount(&field.value());
        field.set_value(&self.formatted_amount());
        events.dispatch(UiEvent::AmountChanged);
    }

    pub fn update_description(&mut self, value: &str) {
        value.clone_into(&mut self.description);
    }

    pub fn dispatch_var_changed(&self, events: &(impl EventSink + ?Sized)) {
        events.dispatch(UiEvent::VarChanged);
    }

    pub fn dispatch_account_changed(&self, events: &(impl EventSink + ?Sized)) {
        events.dispatch(UiEvent::AccountChanged);
    }
}
