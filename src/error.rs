//! Error types shared across the crate.
//!
//! None of these are fatal to the page. Configuration errors fall back to
//! defaults at the call site; submission errors end up in a user-visible
//! alert and leave the form ready for another attempt.

// =============================================================================
// CONFIG
// =============================================================================

/// Errors produced while loading [`crate::config::UiConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for `UiConfig`.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// =============================================================================
// DOM
// =============================================================================

/// A browser API call failed while reading the page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DomError(pub String);

#[cfg(feature = "hydrate")]
impl DomError {
    /// Best-effort message from a thrown JS value.
    pub fn from_js(value: wasm_bindgen::JsValue) -> Self {
        Self(js_message(&value))
    }
}

/// `message` of a JS `Error`, the string itself, or its debug form.
#[cfg(feature = "hydrate")]
pub(crate) fn js_message(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// =============================================================================
// NETWORK
// =============================================================================

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors produced by the quick-transaction submission flow.
///
/// `Display` renders the text shown to the user after the alert prefix.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The form could not be read from the page.
    #[error(transparent)]
    Form(#[from] DomError),

    /// The request could not be sent or its body could not be read.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("{body}")]
    Rejected { status: u16, body: String },

    /// The success body did not carry a usable transaction id.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

// =============================================================================
// BINDING
// =============================================================================

/// A bound element asked a record for something it cannot do.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("{component} has no method {method}")]
    UnknownMethod { component: &'static str, method: String },

    /// The method reads an input but was called without an event or element.
    #[error("{method} needs an input element")]
    MissingInput { method: &'static str },
}
