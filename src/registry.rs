//! Named component factories.
//!
//! Markup refers to components by name only (`x-data="navLaporan"`), so no
//! expression is ever evaluated from HTML. The table is built once per
//! process; [`register_components`] is safe to call from every entry point.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::OnceLock;

use crate::config::UiConfig;
use crate::dom::ElementData;
use crate::state::nav::{self, NavSection, NavSpec};
use crate::state::percentage::PercentageToggle;
use crate::state::quick_transaction::QuickTransactionForm;
use crate::state::selector::{IdTypeSelector, VoidForm};
use crate::state::toggle::{ExpandableState, SearchFilterState, ShowState, SidebarState, ToggleState};
use crate::state::transaction_form::TransactionForm;
use crate::storage::SharedStore;

/// A live state record created by a factory.
#[derive(Clone, Debug)]
pub enum Component {
    Toggle(ToggleState),
    SearchFilter(SearchFilterState),
    Sidebar(SidebarState),
    Expandable(ExpandableState),
    Show(ShowState),
    IdTypeSelector(IdTypeSelector),
    VoidForm(VoidForm),
    PercentageToggle(PercentageToggle),
    Nav(NavSection),
    TransactionForm(TransactionForm),
    /// Shared so an in-flight submit and the bound markup see one
    /// `submitting` flag.
    QuickTransactionForm(Rc<RefCell<QuickTransactionForm>>),
}

/// What a factory may read when its element is bound.
#[derive(Clone, Copy, Debug)]
pub struct MountContext<'a> {
    pub element: &'a ElementData,
    pub store: &'a SharedStore,
    pub config: &'a UiConfig,
}

pub type Factory = fn(&MountContext<'_>) -> Component;

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    factories: BTreeMap<&'static str, Factory>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every component the application markup uses.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for &(name, factory) in DEFAULT_COMPONENTS {
            registry.register(name, factory);
        }
        registry
    }

    /// Add a factory. The first registration of a name wins; returns
    /// `false` for a duplicate.
    pub fn register(&mut self, name: &'static str, factory: Factory) -> bool {
        if self.factories.contains_key(name) {
            log::warn!("component {name} already registered");
            return false;
        }
        self.factories.insert(name, factory);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Fresh record for `name`, or `None` for an unknown component.
    pub fn create(&self, name: &str, ctx: &MountContext<'_>) -> Option<Component> {
        self.factories.get(name).map(|factory| factory(ctx))
    }
}

static REGISTRY: OnceLock<ComponentRegistry> = OnceLock::new();

/// Build the process-wide registry on first call; later calls return the
/// same table.
pub fn register_components() -> &'static ComponentRegistry {
    REGISTRY.get_or_init(|| {
        let registry = ComponentRegistry::with_defaults();
        log::debug!("registered {} components", registry.len());
        registry
    })
}

pub fn is_registered() -> bool {
    REGISTRY.get().is_some()
}

// =============================================================================
// FACTORIES
// =============================================================================

const DEFAULT_COMPONENTS: &[(&str, Factory)] = &[
    ("toggleState", toggle_state),
    ("searchFilterState", search_filter_state),
    ("sidebarState", sidebar_state),
    ("expandableState", expandable_state),
    ("showState", show_state),
    ("idTypeSelector", id_type_selector),
    ("voidForm", void_form),
    ("percentageToggle", percentage_toggle),
    ("navAkuntansi", nav_akuntansi),
    ("navLaporan", nav_laporan),
    ("navProyek", nav_proyek),
    ("navInventori", nav_inventori),
    ("navPayroll", nav_payroll),
    ("navMaster", nav_master),
    ("navOpenDefault", nav_open_default),
    ("navClosedDefault", nav_closed_default),
    ("transactionForm", transaction_form),
    ("quickTransactionForm", quick_transaction_form),
];

fn toggle_state(_: &MountContext<'_>) -> Component {
    Component::Toggle(ToggleState::default())
}

fn search_filter_state(_: &MountContext<'_>) -> Component {
    Component::SearchFilter(SearchFilterState::default())
}

fn sidebar_state(_: &MountContext<'_>) -> Component {
    Component::Sidebar(SidebarState::default())
}

fn expandable_state(_: &MountContext<'_>) -> Component {
    Component::Expandable(ExpandableState::default())
}

fn show_state(_: &MountContext<'_>) -> Component {
    Component::Show(ShowState::default())
}

fn id_type_selector(ctx: &MountContext<'_>) -> Component {
    let mut selector = IdTypeSelector::default();
    selector.init_from_element(ctx.element);
    Component::IdTypeSelector(selector)
}

fn void_form(_: &MountContext<'_>) -> Component {
    Component::VoidForm(VoidForm::default())
}

fn percentage_toggle(ctx: &MountContext<'_>) -> Component {
    Component::PercentageToggle(PercentageToggle::from_element(ctx.element))
}

fn nav_akuntansi(ctx: &MountContext<'_>) -> Component {
    persisted_nav(ctx, nav::NAV_AKUNTANSI)
}

fn nav_laporan(ctx: &MountContext<'_>) -> Component {
    persisted_nav(ctx, nav::NAV_LAPORAN)
}

fn nav_proyek(ctx: &MountContext<'_>) -> Component {
    persisted_nav(ctx, nav::NAV_PROYEK)
}

fn nav_inventori(ctx: &MountContext<'_>) -> Component {
    persisted_nav(ctx, nav::NAV_INVENTORI)
}

fn nav_payroll(ctx: &MountContext<'_>) -> Component {
    persisted_nav(ctx, nav::NAV_PAYROLL)
}

fn nav_master(ctx: &MountContext<'_>) -> Component {
    persisted_nav(ctx, nav::NAV_MASTER)
}

fn nav_open_default(_: &MountContext<'_>) -> Component {
    Component::Nav(NavSection::new(true))
}

fn nav_closed_default(_: &MountContext<'_>) -> Component {
    Component::Nav(NavSection::new(false))
}

fn transaction_form(ctx: &MountContext<'_>) -> Component {
    Component::TransactionForm(TransactionForm::from_element(ctx.element))
}

fn quick_transaction_form(_: &MountContext<'_>) -> Component {
    Component::QuickTransactionForm(Rc::new(RefCell::new(QuickTransactionForm::default())))
}

fn persisted_nav(ctx: &MountContext<'_>, spec: NavSpec) -> Component {
    Component::Nav(NavSection::persisted(ctx.store.clone(), ctx.config.storage_key(spec.key), spec.default_open))
}
