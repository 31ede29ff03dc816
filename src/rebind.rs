//! Rebinding after partial page updates.
//!
//! When htmx swaps a fragment, the markup inside it is new but any state
//! records bound to the old markup are stale. The hook destroys every
//! binding under the swapped subtree and initialises it again, so the new
//! elements get fresh records. Nothing carries over except what a record
//! restores from the store on creation.

#[cfg(test)]
#[path = "rebind_test.rs"]
mod rebind_test;

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::config::UiConfig;
use crate::dom::ElementData;
use crate::registry::{Component, ComponentRegistry, MountContext};
use crate::storage::SharedStore;

/// A UI framework able to tear down and rebuild bindings under a node.
pub trait TreeBinder {
    type Node: ?Sized;

    fn destroy_tree(&self, node: &Self::Node);
    fn init_tree(&self, node: &Self::Node);
}

/// Destroy then re-initialise `target`'s bindings.
///
/// Returns `false` (and does nothing) when either the framework or the
/// target is missing, e.g. the event fired before the framework loaded.
pub fn rebind<B: TreeBinder + ?Sized>(binder: Option<&B>, target: Option<&B::Node>) -> bool {
    let (Some(binder), Some(target)) = (binder, target) else {
        return false;
    };
    binder.destroy_tree(target);
    binder.init_tree(target);
    true
}

// =============================================================================
// NATIVE BINDINGS
// =============================================================================

/// One element carrying a component reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingSite {
    pub component: String,
    pub element: ElementData,
}

/// A swappable region of the page and the binding sites inside it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subtree {
    pub id: String,
    pub sites: Vec<BindingSite>,
}

impl Subtree {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), sites: Vec::new() }
    }

    #[must_use]
    pub fn with_site(mut self, component: &str, element: ElementData) -> Self {
        self.sites.push(BindingSite { component: component.to_owned(), element });
        self
    }
}

/// Live records per subtree, created from the registry.
#[derive(Debug)]
pub struct Bindings<'r> {
    registry: &'r ComponentRegistry,
    store: SharedStore,
    config: UiConfig,
    live: RefCell<BTreeMap<String, Vec<Component>>>,
}

impl<'r> Bindings<'r> {
    pub fn new(registry: &'r ComponentRegistry, store: SharedStore, config: UiConfig) -> Self {
        Self { registry, store, config, live: RefCell::new(BTreeMap::new()) }
    }

    pub fn is_bound(&self, subtree_id: &str) -> bool {
        self.live.borrow().contains_key(subtree_id)
    }

    /// Run `f` over the records bound under `subtree_id`.
    pub fn with_components<R>(&self, subtree_id: &str, f: impl FnOnce(&mut [Component]) -> R) -> Option<R> {
        let mut live = self.live.borrow_mut();
        live.get_mut(subtree_id).map(|components| f(components))
    }
}

impl TreeBinder for Bindings<'_> {
    type Node = Subtree;

    fn destroy_tree(&self, node: &Subtree) {
        if let Some(dropped) = self.live.borrow_mut().remove(&node.id) {
            log::debug!("destroyed {} bindings under {}", dropped.len(), node.id);
        }
    }

    fn init_tree(&self, node: &Subtree) {
        let mut components = Vec::with_capacity(node.sites.len());
        for site in &node.sites {
            let ctx = MountContext { element: &site.element, store: &self.store, config: &self.config };
            match self.registry.create(&site.component, &ctx) {
                Some(component) => components.push(component),
                None => log::warn!("unknown component {} under {}", site.component, node.id),
            }
        }
        self.live.borrow_mut().insert(node.id.clone(), components);
    }
}

// =============================================================================
// BROWSER HOOK
// =============================================================================

/// The framework object on `window` (e.g. `window.Alpine`), driven through
/// its `destroyTree` / `initTree` methods.
#[cfg(feature = "hydrate")]
#[derive(Clone, Debug)]
pub struct FrameworkHandle {
    handle: wasm_bindgen::JsValue,
}

#[cfg(feature = "hydrate")]
impl FrameworkHandle {
    /// Look up `window[global]`; `None` while the framework is not loaded.
    pub fn from_window(global: &str) -> Option<Self> {
        let window = web_sys::window()?;
        let handle = js_sys::Reflect::get(&window, &global.into()).ok()?;
        if handle.is_undefined() || handle.is_null() {
            return None;
        }
        Some(Self { handle })
    }

    pub fn as_js(&self) -> &wasm_bindgen::JsValue {
        &self.handle
    }

    fn call(&self, method: &str, node: &web_sys::Element) {
        use wasm_bindgen::JsCast;

        let func = js_sys::Reflect::get(&self.handle, &method.into())
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        let Some(func) = func else {
            log::warn!("framework has no {method}");
            return;
        };
        if let Err(e) = func.call1(&self.handle, node) {
            log::error!("{method} failed: {}", crate::error::js_message(&e));
        }
    }
}

#[cfg(feature = "hydrate")]
impl TreeBinder for FrameworkHandle {
    type Node = web_sys::Element;

    fn destroy_tree(&self, node: &web_sys::Element) {
        self.call("destroyTree", node);
    }

    fn init_tree(&self, node: &web_sys::Element) {
        self.call("initTree", node);
    }
}

/// Listen for the configured swap event on `document` and rebind the
/// event's `detail.target`. The listener lives for the page's lifetime.
///
/// # Errors
///
/// Returns [`crate::error::DomError`] if the listener cannot be attached.
#[cfg(feature = "hydrate")]
pub fn install_hook(document: &web_sys::Document, config: &UiConfig) -> Result<(), crate::error::DomError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let global = config.framework_global.clone();
    let on_settle = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let target = event
            .dyn_ref::<web_sys::CustomEvent>()
            .and_then(|ev| js_sys::Reflect::get(&ev.detail(), &"target".into()).ok())
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok());
        let framework = FrameworkHandle::from_window(&global);
        if rebind(framework.as_ref(), target.as_ref()) {
            log::debug!("rebound swapped subtree");
        }
    });
    document
        .add_event_listener_with_callback(&config.rebind_event, on_settle.as_ref().unchecked_ref())
        .map_err(crate::error::DomError::from_js)?;
    on_settle.forget();
    Ok(())
}
