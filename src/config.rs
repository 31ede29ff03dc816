//! Client configuration.
//!
//! Every field has a default matching the server's routes and templates, so
//! a page that ships no configuration gets working components. Pages can
//! override any subset through a JSON document (see [`UiConfig::from_json`]).

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_TRANSACTION_ENDPOINT: &str = "/transactions/api";
pub const DEFAULT_TRANSACTION_DETAIL_PREFIX: &str = "/transactions/";
pub const DEFAULT_QUICK_MODAL_ID: &str = "quick-transaction-modal";
pub const DEFAULT_QUICK_FORM_ID: &str = "quick-transaction-form";
pub const DEFAULT_CSRF_TOKEN_META: &str = "_csrf";
pub const DEFAULT_CSRF_HEADER_META: &str = "_csrf_header";
pub const DEFAULT_STORAGE_PREFIX: &str = "_x_";
pub const DEFAULT_REBIND_EVENT: &str = "htmx:afterSettle";
pub const DEFAULT_FRAMEWORK_GLOBAL: &str = "Alpine";
pub const DEFAULT_ALERT_PREFIX: &str = "Gagal menyimpan: ";

/// Name of the `<meta>` tag the browser glue reads configuration from.
pub const CONFIG_META_NAME: &str = "finance-ui-config";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct UiConfig {
    pub transaction_endpoint: String,
    pub transaction_detail_prefix: String,
    pub quick_modal_id: String,
    pub quick_form_id: String,
    pub csrf_token_meta: String,
    pub csrf_header_meta: String,
    pub storage_prefix: String,
    pub rebind_event: String,
    pub framework_global: String,
    pub alert_prefix: String,
    pub log_level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            transaction_endpoint: DEFAULT_TRANSACTION_ENDPOINT.to_owned(),
            transaction_detail_prefix: DEFAULT_TRANSACTION_DETAIL_PREFIX.to_owned(),
            quick_modal_id: DEFAULT_QUICK_MODAL_ID.to_owned(),
            quick_form_id: DEFAULT_QUICK_FORM_ID.to_owned(),
            csrf_token_meta: DEFAULT_CSRF_TOKEN_META.to_owned(),
            csrf_header_meta: DEFAULT_CSRF_HEADER_META.to_owned(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_owned(),
            rebind_event: DEFAULT_REBIND_EVENT.to_owned(),
            framework_global: DEFAULT_FRAMEWORK_GLOBAL.to_owned(),
            alert_prefix: DEFAULT_ALERT_PREFIX.to_owned(),
            log_level: "debug".to_owned(),
        }
    }
}

impl UiConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// Missing fields take their defaults; unknown fields are rejected so a
    /// typo does not silently fall back.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value fails validation.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants the rest of the crate relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_path("transactionEndpoint", &self.transaction_endpoint)?;
        require_path("transactionDetailPrefix", &self.transaction_detail_prefix)?;
        require_non_empty("quickModalId", &self.quick_modal_id)?;
        require_non_empty("quickFormId", &self.quick_form_id)?;
        require_non_empty("csrfTokenMeta", &self.csrf_token_meta)?;
        require_non_empty("csrfHeaderMeta", &self.csrf_header_meta)?;
        require_non_empty("rebindEvent", &self.rebind_event)?;
        require_non_empty("frameworkGlobal", &self.framework_global)?;
        parse_log_level(&self.log_level)?;
        Ok(())
    }

    /// Full storage key for a persisted navigation flag.
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}{key}", self.storage_prefix)
    }

    /// Detail page path for a created transaction.
    pub fn transaction_detail_path(&self, id: &str) -> String {
        format!("{}{id}", self.transaction_detail_prefix)
    }

    /// Configured log level. Validation guarantees the string is known;
    /// anything else maps to `Debug`.
    pub fn level(&self) -> log::Level {
        parse_log_level(&self.log_level).unwrap_or(log::Level::Debug)
    }

    /// Read configuration from the page's `<meta name="finance-ui-config">`.
    ///
    /// Falls back to defaults (with a warning) when the tag is absent or
    /// its content does not validate.
    #[cfg(feature = "hydrate")]
    pub fn from_page(document: &web_sys::Document) -> Self {
        let selector = format!("meta[name=\"{CONFIG_META_NAME}\"]");
        let Ok(Some(meta)) = document.query_selector(&selector) else {
            return Self::default();
        };
        let Some(raw) = meta.get_attribute("content") else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring page config: {e}");
                Self::default()
            }
        }
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid { field, reason: "must not be empty".into() });
    }
    Ok(())
}

fn require_path(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if !value.starts_with('/') {
        return Err(ConfigError::Invalid { field, reason: format!("'{value}' must start with '/'") });
    }
    Ok(())
}

fn parse_log_level(raw: &str) -> Result<log::Level, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "error" => Ok(log::Level::Error),
        "warn" => Ok(log::Level::Warn),
        "info" => Ok(log::Level::Info),
        "debug" => Ok(log::Level::Debug),
        "trace" => Ok(log::Level::Trace),
        other => Err(ConfigError::Invalid {
            field: "logLevel",
            reason: format!("unknown level '{other}' (expected error, warn, info, debug or trace)"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
