//! The surface a bound element sees.
//!
//! DESIGN
//! ======
//! The binding framework only ever sees a plain object per element: the
//! record's fields and derived values as properties, plus one function per
//! method. [`Component::snapshot`] produces the properties,
//! [`Component::call`] runs a method by name, and [`Component::absorb`]
//! takes back the fields markup may write directly (`x-model`). The
//! browser bridge at the bottom of this file wires those three into
//! `Alpine.data`; everything above it is plain Rust.
//!
//! ```text
//! Alpine.data(name) ──▶ factory ──▶ { ...snapshot, init(), toggle(), ... }
//!                                        │ method call
//!                                        ▼
//!                      absorb(props) ─▶ call(method) ─▶ snapshot ─▶ proxy
//! ```

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use serde_json::{Map, Value};

use crate::config::UiConfig;
use crate::dom::{ElementData, EventSink, InputField, Page};
use crate::error::BindingError;
use crate::registry::Component;

/// Method name of the quick form's asynchronous submit. It is not routed
/// through [`Component::call`].
pub const SUBMIT_METHOD: &str = "submitForm";

/// Everything a method may touch besides its own record.
pub struct MethodCall<'a> {
    /// The input behind `$event.target` (or the element passed in).
    pub field: Option<&'a mut dyn InputField>,
    /// Hidden `.var-value` input paired with `field`, if any.
    pub hidden: Option<&'a mut dyn InputField>,
    pub events: &'a dyn EventSink,
    pub page: &'a dyn Page,
    pub config: &'a UiConfig,
}

impl MethodCall<'_> {
    fn field(&mut self, method: &'static str) -> Result<&mut dyn InputField, BindingError> {
        match self.field.as_deref_mut() {
            Some(field) => Ok(field),
            None => Err(BindingError::MissingInput { method }),
        }
    }
}

impl Component {
    /// Short name of the record kind, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Toggle(_) => "toggle",
            Self::SearchFilter(_) => "searchFilter",
            Self::Sidebar(_) => "sidebar",
            Self::Expandable(_) => "expandable",
            Self::Show(_) => "show",
            Self::IdTypeSelector(_) => "idTypeSelector",
            Self::VoidForm(_) => "voidForm",
            Self::PercentageToggle(_) => "percentageToggle",
            Self::Nav(_) => "nav",
            Self::TransactionForm(_) => "transactionForm",
            Self::QuickTransactionForm(_) => "quickTransactionForm",
        }
    }

    /// Methods markup may call, excluding [`SUBMIT_METHOD`].
    pub fn methods(&self) -> &'static [&'static str] {
        match self {
            Self::Toggle(_) => &["toggle", "close"],
            Self::SearchFilter(_) => &["toggle", "openDropdown", "closeDropdown", "updateHasQuery"],
            Self::Sidebar(_) => &["toggleSidebar", "openSidebar", "closeSidebar"],
            Self::Expandable(_) => &["toggleExpanded"],
            Self::Show(_) => &["toggleShow", "closeShow"],
            Self::IdTypeSelector(_) => &["initFromElement", "updateFromEvent"],
            Self::VoidForm(_) => &[],
            Self::PercentageToggle(_) => &["setFixed", "setPercentage"],
            Self::Nav(_) => &["toggle", "openSection", "closeSection"],
            Self::TransactionForm(_) => &[
                "getSubmitButtonText",
                "getSubmitPostButtonText",
                "updateAmount",
                "updateDescription",
                "dispatchVarChanged",
                "dispatchAccountChanged",
            ],
            Self::QuickTransactionForm(_) => &["updateAmount", "updateVariable", "closeModal", "dispatchAccountChanged"],
        }
    }

    /// Properties exposed to markup, derived values included.
    pub fn snapshot(&self) -> Map<String, Value> {
        let mut props = Map::new();
        let mut put = |key: &str, value: Value| {
            props.insert(key.to_owned(), value);
        };
        match self {
            Self::Toggle(t) => put("open", t.open.into()),
            Self::SearchFilter(s) => {
                put("open", s.open.into());
                put("hasQuery", s.has_query.into());
            }
            Self::Sidebar(s) => put("sidebarOpen", s.sidebar_open.into()),
            Self::Expandable(e) => put("expanded", e.expanded.into()),
            Self::Show(s) => put("show", s.show.into()),
            Self::IdTypeSelector(s) => put("idType", s.id_type.clone().into()),
            Self::VoidForm(v) => {
                put("voidReason", v.void_reason.clone().into());
                put("confirmVoid", v.confirm_void.into());
            }
            Self::PercentageToggle(p) => put("isPercentage", p.is_percentage.into()),
            Self::Nav(n) => put("open", n.is_open().into()),
            Self::TransactionForm(f) => {
                put("amount", f.amount.into());
                put("description", f.description.clone().into());
                put("submitting", f.submitting.into());
                put("notSubmitting", f.not_submitting().into());
                put("formattedAmount", f.formatted_amount().into());
            }
            Self::QuickTransactionForm(form) => {
                let f = form.borrow();
                put("amount", f.amount.into());
                put("submitting", f.submitting.into());
                put("formattedAmount", f.formatted_amount().into());
                put("submitButtonText", f.submit_button_text().into());
            }
        }
        props
    }

    /// Take back fields markup writes directly. Keys of the wrong type are
    /// ignored; everything else stays owned by the record.
    pub fn absorb(&mut self, props: &Map<String, Value>) {
        let text = |key: &str| props.get(key).and_then(Value::as_str);
        match self {
            Self::IdTypeSelector(s) => {
                if let Some(v) = text("idType") {
                    s.update_from_event(v);
                }
            }
            Self::VoidForm(v) => {
                if let Some(reason) = text("voidReason") {
                    v.update_reason(reason);
                }
                if let Some(checked) = props.get("confirmVoid").and_then(Value::as_bool) {
                    v.set_confirm(checked);
                }
            }
            Self::TransactionForm(f) => {
                if let Some(d) = text("description") {
                    f.update_description(d);
                }
            }
            _ => {}
        }
    }

    /// Run `method`. Getter-style methods return their text; the rest
    /// return `Value::Null`.
    ///
    /// # Errors
    ///
    /// [`BindingError::UnknownMethod`] for a name not in [`Self::methods`],
    /// [`BindingError::MissingInput`] when an input-reading method has no
    /// field to read.
    pub fn call(&mut self, method: &str, mut call: MethodCall<'_>) -> Result<Value, BindingError> {
        let kind = self.kind();
        let unknown = || BindingError::UnknownMethod { component: kind, method: method.to_owned() };
        match self {
            Self::Toggle(t) => match method {
                "toggle" => t.toggle(),
                "close" => t.close(),
                _ => return Err(unknown()),
            },
            Self::SearchFilter(s) => match method {
                "toggle" => s.toggle(),
                "openDropdown" => s.open_dropdown(),
                "closeDropdown" => s.close_dropdown(),
                "updateHasQuery" => s.update_has_query(&call.field("updateHasQuery")?.value()),
                _ => return Err(unknown()),
            },
            Self::Sidebar(s) => match method {
                "toggleSidebar" => s.toggle_sidebar(),
                "openSidebar" => s.open_sidebar(),
                "closeSidebar" => s.close_sidebar(),
                _ => return Err(unknown()),
            },
            Self::Expandable(e) => match method {
                "toggleExpanded" => e.toggle_expanded(),
                _ => return Err(unknown()),
            },
            Self::Show(s) => match method {
                "toggleShow" => s.toggle_show(),
                "closeShow" => s.close_show(),
                _ => return Err(unknown()),
            },
            Self::IdTypeSelector(s) => match method {
                "initFromElement" => {
                    let el = match call.field.as_deref() {
                        Some(field) => ElementData::new().with_value(&field.value()),
                        None => ElementData::new(),
                    };
                    s.init_from_element(&el);
                }
                "updateFromEvent" => s.update_from_event(&call.field("updateFromEvent")?.value()),
                _ => return Err(unknown()),
            },
            Self::PercentageToggle(p) => match method {
                "setFixed" => p.set_fixed(),
                "setPercentage" => p.set_percentage(),
                _ => return Err(unknown()),
            },
            Self::Nav(n) => match method {
                "toggle" => n.toggle(),
                "openSection" => n.open_section(),
                "closeSection" => n.close_section(),
                _ => return Err(unknown()),
            },
            Self::TransactionForm(f) => match method {
                "getSubmitButtonText" => return Ok(f.submit_button_text().into()),
                "getSubmitPostButtonText" => return Ok(f.submit_post_button_text().into()),
                "updateAmount" => {
                    let events = call.events;
                    f.update_amount(call.field("updateAmount")?, events);
                }
                "updateDescription" => f.update_description(&call.field("updateDescription")?.value()),
                "dispatchVarChanged" => f.dispatch_var_changed(call.events),
                "dispatchAccountChanged" => f.dispatch_account_changed(call.events),
                _ => return Err(unknown()),
            },
            Self::QuickTransactionForm(form) => {
                let mut f = form.borrow_mut();
                match method {
                    "updateAmount" => f.update_amount(call.field("updateAmount")?),
                    "updateVariable" => {
                        let MethodCall { field, hidden, .. } = call;
                        let Some(field) = field else {
                            return Err(BindingError::MissingInput { method: "updateVariable" });
                        };
                        f.update_variable(field, hidden);
                    }
                    "closeModal" => f.close_modal(call.page, call.config),
                    "dispatchAccountChanged" => f.dispatch_account_changed(call.events),
                    _ => return Err(unknown()),
                }
            }
            Self::VoidForm(_) => return Err(unknown()),
        }
        Ok(Value::Null)
    }
}

// =============================================================================
// BROWSER BRIDGE
// =============================================================================

#[cfg(feature = "hydrate")]
pub use bridge::register_with_framework;

#[cfg(feature = "hydrate")]
mod bridge {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};

    use serde_json::{Map, Value};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::{Closure, JsValue};

    use super::{MethodCall, SUBMIT_METHOD};
    use crate::config::UiConfig;
    use crate::dom::{BrowserPage, ElementData, ElementEvents, FormFields, InputField, ValueElement};
    use crate::error::{DomError, js_message};
    use crate::net::api::GlooTransport;
    use crate::registry::{Component, ComponentRegistry, MountContext};
    use crate::state::quick_transaction;
    use crate::storage::SharedStore;

    thread_local! {
        /// Instances between the framework's factory call and `destroy()`.
        /// The object's functions only hold weak references.
        static LIVE: RefCell<HashMap<u32, Rc<Instance>>> = RefCell::new(HashMap::new());
        static NEXT_ID: Cell<u32> = const { Cell::new(0) };
    }

    /// What every instance of every component shares.
    struct Shared {
        registry: &'static ComponentRegistry,
        store: SharedStore,
        config: UiConfig,
        framework: JsValue,
    }

    /// One bound element: its record and the plain object handed to the
    /// framework.
    struct Instance {
        id: u32,
        name: &'static str,
        shared: Rc<Shared>,
        object: js_sys::Object,
        component: RefCell<Component>,
    }

    /// Register every factory with `framework.data(name, factory)`.
    /// Returns how many were registered.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] when the framework has no `data` function or
    /// rejects a registration.
    pub fn register_with_framework(
        framework: &JsValue,
        registry: &'static ComponentRegistry,
        store: SharedStore,
        config: &UiConfig,
    ) -> Result<usize, DomError> {
        let data = js_sys::Reflect::get(framework, &"data".into())
            .map_err(DomError::from_js)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| DomError(format!("{} has no data()", config.framework_global)))?;
        let shared = Rc::new(Shared { registry, store, config: config.clone(), framework: framework.clone() });

        let mut count = 0;
        for name in registry.names() {
            let shared = Rc::clone(&shared);
            let factory = Closure::<dyn Fn() -> JsValue>::new(move || Instance::create(name, &shared));
            data.call2(framework, &name.into(), factory.as_ref()).map_err(DomError::from_js)?;
            factory.forget();
            count += 1;
        }
        Ok(count)
    }

    impl Instance {
        /// Factory body: a fresh record and its object. The record is
        /// mounted again in `init()` once `$el` is known.
        fn create(name: &'static str, shared: &Rc<Shared>) -> JsValue {
            let Some(component) = mount(shared, name, &ElementData::new()) else {
                return JsValue::UNDEFINED;
            };
            let methods = component.methods();
            let is_quick_form = matches!(component, Component::QuickTransactionForm(_));
            let id = NEXT_ID.with(|n| {
                let id = n.get();
                n.set(id.wrapping_add(1));
                id
            });
            let instance = Rc::new(Self {
                id,
                name,
                shared: Rc::clone(shared),
                object: js_sys::Object::new(),
                component: RefCell::new(component),
            });
            instance.write_props(&instance.object);

            let weak = Rc::downgrade(&instance);
            let init = Closure::<dyn Fn()>::new(move || {
                with_live(&weak, |this| this.init());
            });
            instance.define("init", init.into_js_value());
            let weak = Rc::downgrade(&instance);
            let destroy = Closure::<dyn Fn()>::new(move || {
                with_live(&weak, |this| this.destroy());
            });
            instance.define("destroy", destroy.into_js_value());
            for &method in methods {
                let weak = Rc::downgrade(&instance);
                let f = Closure::<dyn Fn(JsValue) -> JsValue>::new(move |arg: JsValue| {
                    with_live(&weak, |this| this.invoke(method, &arg)).unwrap_or(JsValue::UNDEFINED)
                });
                instance.define(method, f.into_js_value());
            }
            if is_quick_form {
                let weak = Rc::downgrade(&instance);
                let f = Closure::<dyn Fn(JsValue)>::new(move |arg: JsValue| {
                    with_live(&weak, |this| this.submit(&arg));
                });
                instance.define(SUBMIT_METHOD, f.into_js_value());
            }

            let object = instance.object.clone().into();
            LIVE.with(|live| {
                live.borrow_mut().insert(id, instance);
            });
            object
        }

        fn define(&self, key: &str, value: JsValue) {
            if let Err(e) = js_sys::Reflect::set(&self.object, &key.into(), &value) {
                log::warn!("{}: cannot define {key}: {}", self.name, js_message(&e));
            }
        }

        /// The element the framework injected as `$el`.
        fn element(&self) -> Option<web_sys::Element> {
            js_sys::Reflect::get(&self.object, &"$el".into())
                .ok()
                .and_then(|el| el.dyn_into::<web_sys::Element>().ok())
        }

        fn init(&self) {
            let Some(el) = self.element() else {
                return;
            };
            if let Some(component) = mount(&self.shared, self.name, &ElementData::from_element(&el)) {
                if let Component::TransactionForm(form) = &component {
                    let inputs = form.initial_inputs();
                    fill_input(&el, "#amount", inputs.amount.as_deref());
                    fill_input(&el, "#description", inputs.description.as_deref());
                }
                *self.component.borrow_mut() = component;
            }
            self.sync();
        }

        fn destroy(&self) {
            LIVE.with(|live| {
                live.borrow_mut().remove(&self.id);
            });
        }

        fn invoke(&self, method: &'static str, arg: &JsValue) -> JsValue {
            let Some(page) = BrowserPage::new() else {
                return JsValue::UNDEFINED;
            };
            let keys = self.component.borrow().snapshot();
            let written = read_props(&self.reactive(), &keys);
            self.component.borrow_mut().absorb(&written);

            let input = input_element(arg);
            let mut hidden = input.as_ref().and_then(paired_hidden).map(ValueElement::new);
            let mut field = input.map(ValueElement::new);
            let target: web_sys::EventTarget = match self.element() {
                Some(el) => el.into(),
                None => page.document().clone().into(),
            };
            let events = ElementEvents::new(target);
            let call = MethodCall {
                field: field.as_mut().map(|f| f as &mut dyn InputField),
                hidden: hidden.as_mut().map(|h| h as &mut dyn InputField),
                events: &events,
                page: &page,
                config: &self.shared.config,
            };
            let result = self.component.borrow_mut().call(method, call);
            self.sync();
            match result {
                Ok(Value::String(s)) => s.into(),
                Ok(_) => JsValue::UNDEFINED,
                Err(e) => {
                    log::warn!("{}: {e}", self.name);
                    JsValue::UNDEFINED
                }
            }
        }

        fn submit(self: &Rc<Self>, arg: &JsValue) {
            if let Some(event) = arg.dyn_ref::<web_sys::Event>() {
                event.prevent_default();
            }
            let form = match &*self.component.borrow() {
                Component::QuickTransactionForm(form) => Rc::clone(form),
                _ => return,
            };
            let Some(page) = BrowserPage::new() else {
                return;
            };
            let this = Rc::clone(self);
            wasm_bindgen_futures::spawn_local(async move {
                let config = &this.shared.config;
                quick_transaction::submit_with(
                    &form,
                    || read_quick_form(&page, config),
                    &page,
                    &GlooTransport,
                    config,
                    || this.sync(),
                )
                .await;
            });
        }

        /// The framework's reactive proxy over our object, so writes
        /// re-render. Falls back to the raw object.
        fn reactive(&self) -> JsValue {
            let object: JsValue = self.object.clone().into();
            js_sys::Reflect::get(&self.shared.framework, &"reactive".into())
                .ok()
                .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
                .and_then(|f| f.call1(&self.shared.framework, &object).ok())
                .unwrap_or(object)
        }

        fn sync(&self) {
            self.write_props(&self.reactive());
        }

        fn write_props(&self, target: &JsValue) {
            for (key, value) in self.component.borrow().snapshot() {
                if let Err(e) = js_sys::Reflect::set(target, &key.as_str().into(), &to_js(&value)) {
                    log::warn!("{}: cannot set {key}: {}", self.name, js_message(&e));
                }
            }
        }
    }

    fn with_live<R>(weak: &Weak<Instance>, f: impl FnOnce(&Rc<Instance>) -> R) -> Option<R> {
        let Some(this) = weak.upgrade() else {
            log::debug!("call on a destroyed component");
            return None;
        };
        Some(f(&this))
    }

    fn mount(shared: &Shared, name: &str, element: &ElementData) -> Option<Component> {
        let ctx = MountContext { element, store: &shared.store, config: &shared.config };
        shared.registry.create(name, &ctx)
    }

    /// `$event.target` for an event, the value itself for an element.
    fn input_element(arg: &JsValue) -> Option<web_sys::Element> {
        if let Some(event) = arg.dyn_ref::<web_sys::Event>() {
            return event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok());
        }
        arg.dyn_ref::<web_sys::Element>().cloned()
    }

    /// Next sibling carrying the `var-value` class.
    fn paired_hidden(input: &web_sys::Element) -> Option<web_sys::Element> {
        input.next_element_sibling().filter(|el| el.class_list().contains("var-value"))
    }

    fn fill_input(root: &web_sys::Element, selector: &str, value: Option<&str>) {
        let Some(value) = value else { return };
        if let Ok(Some(el)) = root.query_selector(selector) {
            ValueElement::new(el).set_value(value);
        }
    }

    fn read_quick_form(page: &BrowserPage, config: &UiConfig) -> Result<FormFields, DomError> {
        let form = page
            .document()
            .get_element_by_id(&config.quick_form_id)
            .and_then(|el| el.dyn_into::<web_sys::HtmlFormElement>().ok())
            .ok_or_else(|| DomError(format!("form #{} not found", config.quick_form_id)))?;
        FormFields::from_form(&form)
    }

    /// Current values of `keys` on `target`, strings and booleans only.
    fn read_props(target: &JsValue, keys: &Map<String, Value>) -> Map<String, Value> {
        let mut props = Map::new();
        for key in keys.keys() {
            let Ok(value) = js_sys::Reflect::get(target, &key.as_str().into()) else { continue };
            if let Some(s) = value.as_string() {
                props.insert(key.clone(), Value::String(s));
            } else if let Some(b) = value.as_bool() {
                props.insert(key.clone(), Value::Bool(b));
            }
        }
        props
    }

    fn to_js(value: &Value) -> JsValue {
        match value {
            Value::Bool(b) => JsValue::from_bool(*b),
            Value::Number(n) => n.as_f64().map_or(JsValue::NULL, JsValue::from_f64),
            Value::String(s) => JsValue::from_str(s),
            _ => JsValue::NULL,
        }
    }
}
