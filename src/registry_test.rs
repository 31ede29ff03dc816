use std::rc::Rc;

use super::*;
use crate::storage::{KeyValueStore, MemoryStore};

fn mount<R>(element: &ElementData, store: &SharedStore, f: impl FnOnce(&MountContext<'_>) -> R) -> R {
    let config = UiConfig::default();
    f(&MountContext { element, store, config: &config })
}

fn create(name: &str, element: &ElementData, store: &SharedStore) -> Option<Component> {
    let registry = ComponentRegistry::with_defaults();
    mount(element, store, |ctx| registry.create(name, ctx))
}

// =============================================================
// Table
// =============================================================

#[test]
fn defaults_cover_every_markup_component() {
    let registry = ComponentRegistry::with_defaults();
    let expected = [
        "toggleState",
        "searchFilterState",
        "sidebarState",
        "expandableState",
        "showState",
        "idTypeSelector",
        "voidForm",
        "percentageToggle",
        "navAkuntansi",
        "navLaporan",
        "navProyek",
        "navInventori",
        "navPayroll",
        "navMaster",
        "navOpenDefault",
        "navClosedDefault",
        "transactionForm",
        "quickTransactionForm",
    ];
    for name in expected {
        assert!(registry.contains(name), "{name} missing");
    }
    assert_eq!(registry.len(), expected.len());
}

#[test]
fn register_rejects_duplicate_name() {
    let mut registry = ComponentRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.register("toggleState", toggle_state));
    assert!(!registry.register("toggleState", show_state));
    assert_eq!(registry.len(), 1);

    let store = MemoryStore::shared();
    let el = ElementData::new();
    let created = mount(&el, &store, |ctx| registry.create("toggleState", ctx));
    assert!(matches!(created, Some(Component::Toggle(_))));
}

#[test]
fn unknown_component_is_none() {
    assert!(create("modalState", &ElementData::new(), &MemoryStore::shared()).is_none());
}

#[test]
fn register_components_is_idempotent() {
    let first = register_components();
    let second = register_components();
    assert!(std::ptr::eq(first, second));
    assert!(is_registered());
    assert_eq!(first.len(), ComponentRegistry::with_defaults().len());
}

// =============================================================
// Factories
// =============================================================

#[test]
fn each_create_returns_fresh_state() {
    let registry = ComponentRegistry::with_defaults();
    let store = MemoryStore::shared();
    let el = ElementData::new();
    let Some(Component::Toggle(mut first)) = mount(&el, &store, |ctx| registry.create("toggleState", ctx)) else {
        panic!("expected toggle");
    };
    first.toggle();
    let Some(Component::Toggle(second)) = mount(&el, &store, |ctx| registry.create("toggleState", ctx)) else {
        panic!("expected toggle");
    };
    assert!(first.open);
    assert!(!second.open);
}

#[test]
fn percentage_toggle_reads_element() {
    let el = ElementData::new().with_data("initialPercentage", "true");
    match create("percentageToggle", &el, &MemoryStore::shared()) {
        Some(Component::PercentageToggle(t)) => assert!(t.is_percentage),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn transaction_form_reads_element() {
    let el = ElementData::new().with_data("amount", "75000");
    match create("transactionForm", &el, &MemoryStore::shared()) {
        Some(Component::TransactionForm(f)) => assert_eq!(f.amount, 75_000),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn nav_factories_use_prefixed_keys_and_defaults() {
    let cases = [
        ("navAkuntansi", "_x_nav-akuntansi", true),
        ("navLaporan", "_x_nav-laporan", false),
        ("navProyek", "_x_nav-proyek", false),
        ("navInventori", "_x_nav-inventori", false),
        ("navPayroll", "_x_nav-payroll", false),
        ("navMaster", "_x_nav-master", false),
    ];
    for (name, key, default_open) in cases {
        match create(name, &ElementData::new(), &MemoryStore::shared()) {
            Some(Component::Nav(nav)) => {
                assert_eq!(nav.storage_key(), Some(key), "{name}");
                assert_eq!(nav.is_open(), default_open, "{name}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn nav_factory_restores_from_store() {
    let memory = Rc::new(MemoryStore::new());
    memory.set("_x_nav-laporan", "true");
    let store: SharedStore = memory;
    match create("navLaporan", &ElementData::new(), &store) {
        Some(Component::Nav(nav)) => assert!(nav.is_open()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unpersisted_nav_defaults() {
    let store = MemoryStore::shared();
    match create("navOpenDefault", &ElementData::new(), &store) {
        Some(Component::Nav(nav)) => {
            assert!(nav.is_open());
            assert_eq!(nav.storage_key(), None);
        }
        other => panic!("unexpected {other:?}"),
    }
    match create("navClosedDefault", &ElementData::new(), &store) {
        Some(Component::Nav(nav)) => assert!(!nav.is_open()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn id_type_selector_seeds_from_element_value() {
    let el = ElementData::new().with_value("KTP");
    match create("idTypeSelector", &el, &MemoryStore::shared()) {
        Some(Component::IdTypeSelector(s)) => assert_eq!(s.id_type, "KTP"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn quick_form_instances_do_not_share_state() {
    let store = MemoryStore::shared();
    let el = ElementData::new();
    let (Some(Component::QuickTransactionForm(a)), Some(Component::QuickTransactionForm(b))) =
        (create("quickTransactionForm", &el, &store), create("quickTransactionForm", &el, &store))
    else {
        panic!("expected quick forms");
    };
    a.borrow_mut().submitting = true;
    assert!(!b.borrow().submitting);
}
