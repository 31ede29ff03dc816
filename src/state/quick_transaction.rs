//! Quick transaction modal: amount entry plus JSON submission.
//!
//! DESIGN
//! ======
//! The binding layer keeps the record in a `RefCell`. [`submit_form`]
//! borrows it only around the synchronous steps and never across the
//! network await, so a second click while the request is in flight sees
//! `submitting == true` and is dropped instead of panicking on a double
//! borrow.
//!
//! ```text
//! idle ──submit──▶ submitting ──2xx──▶ idle (dialog closed, navigate to detail)
//!   ▲                  │
//!   └──── alert ◀──────┘ non-2xx / transport / decode error
//! ```

#[cfg(test)]
#[path = "quick_transaction_test.rs"]
mod quick_transaction_test;

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::config::UiConfig;
use crate::dom::{EventSink, FormFields, InputField, Page, UiEvent};
use crate::error::{DomError, SubmitError, TransportError};
use crate::format;
use crate::net::api::{self, Transport};
use crate::net::types::{ApiRequest, CreatedTransaction, QuickTransactionRequest, TransactionId};

pub const SAVE_DRAFT_LABEL: &str = "Simpan Draft";
pub const SAVING_LABEL: &str = "Menyimpan...";

const ACCOUNT_MAPPING_OPEN: &str = "accountMapping[";
const VARIABLE_PREFIX: &str = "var_";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuickTransactionForm {
    pub amount: u64,
    pub submitting: bool,
}

/// Result of one [`submit_form`] call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing was sent.
    Ignored,
    /// The server created the transaction and the page navigated away.
    Created(TransactionId),
    /// The user was alerted; the form is ready for another attempt.
    Failed(SubmitError),
}

impl QuickTransactionForm {
    pub fn formatted_amount(&self) -> String {
        format::format_amount(self.amount)
    }

    pub fn submit_button_text(&self) -> &'static str {
        if self.submitting { SAVING_LABEL } else { SAVE_DRAFT_LABEL }
    }

    pub fn update_amount(&mut self, field: &mut (impl InputField + ?Sized)) {
        self.amount = format::parse_amount(&field.value());
        field.set_value(&self.formatted_amount());
    }

    /// Clean a formula-variable input: the raw digits go into the paired
    /// hidden `.var-value` input (when the markup has one), the grouped
    /// display back into the visible input.
    pub fn update_variable(&self, field: &mut (impl InputField + ?Sized), hidden: Option<&mut dyn InputField>) {
        let raw = format::strip_non_digits(&field.value());
        if let Some(hidden) = hidden {
            hidden.set_value(&raw);
        }
        field.set_value(&format::group_digits(&raw));
    }

    /// Close the hosting dialog, if the page has one.
    pub fn close_modal(&self, page: &(impl Page + ?Sized), config: &UiConfig) {
        page.close_dialog(&config.quick_modal_id);
    }

    pub fn dispatch_account_changed(&self, events: &(impl EventSink + ?Sized)) {
        events.dispatch(UiEvent::AccountChanged);
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// Assemble the create-transaction body from the form's entries.
pub fn build_payload(fields: &FormFields) -> QuickTransactionRequest {
    let variables = collect_variables(fields);
    QuickTransactionRequest {
        template_id: fields.get("templateId").map(str::to_owned),
        amount: fields.get("amount").map_or(0, format::parse_leading_amount),
        description: fields.get("description").map(str::to_owned),
        transaction_date: fields.get("transactionDate").map(str::to_owned),
        reference_number: fields.get("referenceNumber").unwrap_or_default().to_owned(),
        notes: fields.get("notes").unwrap_or_default().to_owned(),
        account_mappings: collect_account_mappings(fields),
        variables: (!variables.is_empty()).then_some(variables),
    }
}

/// `accountMapping[<line>]` entries with a chosen account. Later entries
/// for the same line win.
pub fn collect_account_mappings(fields: &FormFields) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(key, value)| account_mapping_name(key).map(|name| (name.to_owned(), value.to_owned())))
        .collect()
}

/// Line name inside the first well-formed `accountMapping[...]` in `key`.
fn account_mapping_name(key: &str) -> Option<&str> {
    key.match_indices(ACCOUNT_MAPPING_OPEN).find_map(|(at, open)| {
        let rest = &key[at + open.len()..];
        let end = rest.find(']')?;
        (end > 0).then(|| &rest[..end])
    })
}

/// `var_<name>` entries reduced to their digits. Entries with no digits are
/// skipped, as are values too large for an amount.
pub fn collect_variables(fields: &FormFields) -> BTreeMap<String, u64> {
    let mut variables = BTreeMap::new();
    for (key, value) in fields.iter() {
        let Some(name) = key.strip_prefix(VARIABLE_PREFIX) else { continue };
        let digits = format::strip_non_digits(value);
        if digits.is_empty() {
            continue;
        }
        match digits.parse::<u64>() {
            Ok(n) => {
                variables.insert(name.to_owned(), n);
            }
            Err(e) => log::warn!("skipping variable {name}: {e}"),
        }
    }
    variables
}

/// Serialize the payload and attach the anti-forgery header when the page
/// provides one.
///
/// # Errors
///
/// Returns [`TransportError`] if the payload cannot be serialized.
pub fn build_request(
    fields: &FormFields,
    page: &(impl Page + ?Sized),
    config: &UiConfig,
) -> Result<ApiRequest, TransportError> {
    let body = serde_json::to_string(&build_payload(fields)).map_err(|e| TransportError(e.to_string()))?;
    let headers = api::csrf_header(page, config).into_iter().collect();
    Ok(ApiRequest { path: config.transaction_endpoint.clone(), headers, body })
}

// =============================================================================
// SUBMIT
// =============================================================================

/// Submit the quick transaction form with entries already read.
///
/// Ignored while a submission is in flight. On success the modal is
/// closed and the page navigates to the new transaction; on any failure
/// the user gets an alert. `submitting` is always reset before returning.
pub async fn submit_form<T, P>(
    form: &RefCell<QuickTransactionForm>,
    fields: &FormFields,
    page: &P,
    transport: &T,
    config: &UiConfig,
) -> SubmitOutcome
where
    T: Transport + ?Sized,
    P: Page + ?Sized,
{
    submit_with(form, || Ok(fields.clone()), page, transport, config, || {}).await
}

/// [`submit_form`] for the browser: the entries are read only once the
/// in-flight guard has passed, and a form that cannot be read is reported
/// like any other failure. `on_change` runs, with no borrow held, each time
/// `submitting` flips so the bound markup can re-render.
pub async fn submit_with<T, P>(
    form: &RefCell<QuickTransactionForm>,
    read_fields: impl FnOnce() -> Result<FormFields, DomError>,
    page: &P,
    transport: &T,
    config: &UiConfig,
    on_change: impl Fn(),
) -> SubmitOutcome
where
    T: Transport + ?Sized,
    P: Page + ?Sized,
{
    {
        let mut state = form.borrow_mut();
        if state.submitting {
            log::debug!("quick transaction submit ignored: already submitting");
            return SubmitOutcome::Ignored;
        }
        state.submitting = true;
    }
    on_change();

    log::debug!("quick transaction submit to {}", config.transaction_endpoint);
    let request = read_fields()
        .map_err(SubmitError::from)
        .and_then(|fields| build_request(&fields, page, config).map_err(SubmitError::from));
    let result = match request {
        Ok(request) => send(transport, request).await,
        Err(e) => Err(e),
    };

    let outcome = match result {
        Ok(id) => {
            log::debug!("transaction created: {id}");
            page.close_dialog(&config.quick_modal_id);
            page.navigate(&config.transaction_detail_path(&id.to_string()));
            SubmitOutcome::Created(id)
        }
        Err(err) => {
            match &err {
                SubmitError::Rejected { status, body } => {
                    log::error!("quick transaction rejected: {status} {body}");
                }
                other => log::error!("quick transaction failed: {other}"),
            }
            page.alert(&format!("{}{err}", config.alert_prefix));
            SubmitOutcome::Failed(err)
        }
    };

    form.borrow_mut().submitting = false;
    on_change();
    outcome
}

async fn send<T: Transport + ?Sized>(transport: &T, request: ApiRequest) -> Result<TransactionId, SubmitError> {
    let resp = transport.post_json(request).await?;
    log::debug!("quick transaction response status {}", resp.status);
    if !resp.is_success() {
        return Err(SubmitError::Rejected { status: resp.status, body: resp.body });
    }
    let created: CreatedTransaction = serde_json::from_str(&resp.body)?;
    Ok(created.id)
}
