//! Seams between state records and the page.
//!
//! DESIGN
//! ======
//! Records never touch the DOM directly. They read initial values from an
//! [`ElementData`] snapshot, read and write inputs through [`InputField`],
//! and request page-level effects (alerts, navigation, dialogs, custom
//! events) through [`Page`] and [`EventSink`]. The browser implementations
//! live behind the `hydrate` feature; tests use in-memory doubles.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use std::collections::BTreeMap;

#[cfg(feature = "hydrate")]
use crate::error::DomError;

// =============================================================================
// EVENTS
// =============================================================================

/// Notifications a record emits so other page regions (usually an htmx
/// preview) can react.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    AmountChanged,
    VarChanged,
    AccountChanged,
}

impl UiEvent {
    /// DOM event name.
    pub fn name(self) -> &'static str {
        match self {
            Self::AmountChanged => "amount-changed",
            Self::VarChanged => "var-changed",
            Self::AccountChanged => "account-changed",
        }
    }
}

/// Receives [`UiEvent`]s from a record.
pub trait EventSink {
    fn dispatch(&self, event: UiEvent);
}

// =============================================================================
// PAGE EFFECTS
// =============================================================================

/// Page-level effects used by the submission flow.
pub trait Page {
    /// `content` of `<meta name="{name}">`, if present.
    fn meta_content(&self, name: &str) -> Option<String>;

    /// Blocking user-visible alert.
    fn alert(&self, message: &str);

    /// Navigate the browser to `path`.
    fn navigate(&self, path: &str);

    /// Close the `<dialog>` with the given id. Returns `false` when the page
    /// has no such dialog.
    fn close_dialog(&self, id: &str) -> bool;
}

// =============================================================================
// INPUTS
// =============================================================================

/// A text input whose value a record reads and rewrites.
pub trait InputField {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
}

impl InputField for String {
    fn value(&self) -> String {
        self.clone()
    }

    fn set_value(&mut self, value: &str) {
        value.clone_into(self);
    }
}

/// Any element with a `value` property (`input`, `select`, `textarea`).
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug)]
pub struct ValueElement {
    el: web_sys::Element,
}

#[cfg(feature = "hydrate")]
impl ValueElement {
    pub fn new(el: web_sys::Element) -> Self {
        Self { el }
    }
}

#[cfg(feature = "hydrate")]
impl InputField for ValueElement {
    fn value(&self) -> String {
        match js_sys::Reflect::get(&self.el, &"value".into()) {
            Ok(v) => v.as_string().unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    fn set_value(&mut self, value: &str) {
        if let Err(e) = js_sys::Reflect::set(&self.el, &"value".into(), &value.into()) {
            log::warn!("cannot set value: {}", crate::error::js_message(&e));
        }
    }
}

// =============================================================================
// ELEMENT SNAPSHOT
// =============================================================================

/// Attributes of the element a record is bound to, captured at mount time.
///
/// Dataset keys use the DOM's camelCase form (`data-initial-percentage` is
/// `initialPercentage`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementData {
    pub dataset: BTreeMap<String, String>,
    pub value: Option<String>,
}

impl ElementData {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.dataset.insert(key.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_owned());
        self
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    /// Snapshot a live element's dataset and `value` property.
    #[cfg(feature = "hydrate")]
    pub fn from_element(el: &web_sys::Element) -> Self {
        use wasm_bindgen::JsCast;

        let mut data = Self::new();
        if let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() {
            let dataset = html.dataset();
            for key in js_sys::Object::keys(&dataset).iter() {
                let Some(key) = key.as_string() else { continue };
                if let Some(value) = dataset.get(&key) {
                    data.dataset.insert(key, value);
                }
            }
        }
        data.value = js_sys::Reflect::get(el, &"value".into())
            .ok()
            .and_then(|v| v.as_string());
        data
    }
}

// =============================================================================
// FORM FIELDS
// =============================================================================

/// Form entries in document order, as `FormData` yields them.
///
/// Names may repeat; [`FormFields::get`] returns the first match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    entries: Vec<(String, String)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect a live form's entries. File inputs are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] when the browser refuses to build `FormData`.
    #[cfg(feature = "hydrate")]
    pub fn from_form(form: &web_sys::HtmlFormElement) -> Result<Self, DomError> {
        let data = web_sys::FormData::new_with_form(form).map_err(DomError::from_js)?;
        let iter = js_sys::try_iter(&data)
            .map_err(DomError::from_js)?
            .ok_or_else(|| DomError("FormData is not iterable".into()))?;

        let mut fields = Self::new();
        for entry in iter {
            let pair = js_sys::Array::from(&entry.map_err(DomError::from_js)?);
            if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                fields.push(name, value);
            }
        }
        Ok(fields)
    }
}

// =============================================================================
// BROWSER IMPLEMENTATIONS
// =============================================================================

/// [`Page`] backed by the live window and document.
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug)]
pub struct BrowserPage {
    window: web_sys::Window,
    document: web_sys::Document,
}

#[cfg(feature = "hydrate")]
impl BrowserPage {
    /// Returns `None` outside a browser window.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }
}

#[cfg(feature = "hydrate")]
impl Page for BrowserPage {
    fn meta_content(&self, name: &str) -> Option<String> {
        let selector = format!("meta[name=\"{name}\"]");
        let Ok(Some(meta)) = self.document.query_selector(&selector) else {
            return None;
        };
        meta.get_attribute("content")
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            log::warn!("alert failed: {e:?}");
        }
    }

    fn navigate(&self, path: &str) {
        if let Err(e) = self.window.location().set_href(path) {
            log::error!("navigation to {path} failed: {e:?}");
        }
    }

    fn close_dialog(&self, id: &str) -> bool {
        use wasm_bindgen::JsCast;

        match self
            .document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<web_sys::HtmlDialogElement>().ok())
        {
            Some(dialog) => {
                dialog.close();
                true
            }
            None => false,
        }
    }
}

/// [`EventSink`] that dispatches bubbling `CustomEvent`s from an element,
/// so listeners further up the tree (htmx triggers) see them.
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug)]
pub struct ElementEvents {
    target: web_sys::EventTarget,
}

#[cfg(feature = "hydrate")]
impl ElementEvents {
    pub fn new(target: web_sys::EventTarget) -> Self {
        Self { target }
    }
}

#[cfg(feature = "hydrate")]
impl EventSink for ElementEvents {
    fn dispatch(&self, event: UiEvent) {
        let init = web_sys::CustomEventInit::new();
        init.set_bubbles(true);
        init.set_composed(true);
        match web_sys::CustomEvent::new_with_event_init_dict(event.name(), &init) {
            Ok(ev) => {
                if let Err(e) = self.target.dispatch_event(&ev) {
                    log::warn!("dispatch {} failed: {e:?}", event.name());
                }
            }
            Err(e) => log::warn!("create {} failed: {e:?}", event.name()),
        }
    }
}
