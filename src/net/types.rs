//! Wire types for the transaction API.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /transactions/api`.
///
/// `templateId`, `description` and `transactionDate` serialize as `null`
/// when the form has no such field; the server rejects those itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickTransactionRequest {
    pub template_id: Option<String>,
    pub amount: u64,
    pub description: Option<String>,
    pub transaction_date: Option<String>,
    pub reference_number: String,
    pub notes: String,
    /// Template line name → chosen account id.
    pub account_mappings: BTreeMap<String, String>,
    /// Formula variables for detailed templates; omitted when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, u64>>,
}

/// Success body of the create call. Only `id` is read.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedTransaction {
    pub id: TransactionId,
}

/// Server-assigned id; numeric or UUID depending on the deployment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Number(serde_json::Number),
    Text(String),
}

/// Renders as the id appears in a URL: `42.0` from a float-encoding
/// server becomes `42`.
impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => match n.as_f64() {
                Some(v) if n.is_f64() => write!(f, "{v}"),
                _ => write!(f, "{n}"),
            },
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A JSON POST as handed to a [`super::api::Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    /// Extra headers; `Content-Type` is always JSON and not listed here.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
