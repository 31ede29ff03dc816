//! WASM entry points.
//!
//! The page loads this module and calls [`hydrate`] once. Components are
//! handed to the binding framework right away when it is already on
//! `window`, otherwise on its `alpine:init` event, which fires before it
//! walks the DOM.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::binding;
use crate::config::UiConfig;
use crate::dom::BrowserPage;
use crate::registry;
use crate::storage::{LocalStore, SharedStore};

/// Fired by the framework just before it initialises the page.
const FRAMEWORK_INIT_EVENT: &str = "alpine:init";

thread_local! {
    static CONFIG: RefCell<Option<UiConfig>> = const { RefCell::new(None) };
    static REGISTERED: Cell<bool> = const { Cell::new(false) };
}

fn config() -> UiConfig {
    CONFIG.with(|c| c.borrow().clone()).unwrap_or_default()
}

/// Initialise logging and configuration, register components with the
/// framework and install the rebind hook. Later calls do nothing.
#[wasm_bindgen]
pub fn hydrate() {
    if CONFIG.with(|c| c.borrow().is_some()) {
        return;
    }
    let Some(page) = BrowserPage::new() else {
        return;
    };
    let cfg = UiConfig::from_page(page.document());
    crate::logging::init(cfg.level());
    CONFIG.with(|c| *c.borrow_mut() = Some(cfg.clone()));

    if register_components() == 0 {
        let on_init = Closure::<dyn FnMut()>::new(|| {
            register_components();
        });
        if let Err(e) = page
            .document()
            .add_event_listener_with_callback(FRAMEWORK_INIT_EVENT, on_init.as_ref().unchecked_ref())
        {
            log::error!("cannot wait for {FRAMEWORK_INIT_EVENT}: {}", crate::error::js_message(&e));
        }
        on_init.forget();
    }

    if let Err(e) = crate::rebind::install_hook(page.document(), &cfg) {
        log::error!("rebind hook not installed: {e}");
    }
}

/// Register every component with `window[framework_global].data`, once.
/// Returns the number registered by this call: 0 when the framework is not
/// loaded yet or registration already happened.
#[wasm_bindgen(js_name = registerComponents)]
pub fn register_components() -> usize {
    if REGISTERED.with(Cell::get) {
        return 0;
    }
    let cfg = config();
    let Some(framework) = crate::rebind::FrameworkHandle::from_window(&cfg.framework_global) else {
        log::debug!("{} not loaded yet", cfg.framework_global);
        return 0;
    };
    let store: SharedStore = Rc::new(LocalStore);
    match binding::register_with_framework(framework.as_js(), registry::register_components(), store, &cfg) {
        Ok(count) => {
            REGISTERED.with(|r| r.set(true));
            log::info!("finance-ui ready: {count} components");
            count
        }
        Err(e) => {
            log::error!("component registration failed: {e}");
            0
        }
    }
}
