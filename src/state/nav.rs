//! Collapsible sidebar navigation sections.
//!
//! Most sections remember whether they were open across page loads; the
//! flag is written through to the injected store on every change.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use crate::storage::{self, SharedStore};

/// A persisted section: storage key (before the configured prefix) and the
/// state used when nothing is stored yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavSpec {
    pub key: &'static str,
    pub default_open: bool,
}

pub const NAV_AKUNTANSI: NavSpec = NavSpec { key: "nav-akuntansi", default_open: true };
pub const NAV_LAPORAN: NavSpec = NavSpec { key: "nav-laporan", default_open: false };
pub const NAV_PROYEK: NavSpec = NavSpec { key: "nav-proyek", default_open: false };
pub const NAV_INVENTORI: NavSpec = NavSpec { key: "nav-inventori", default_open: false };
pub const NAV_PAYROLL: NavSpec = NavSpec { key: "nav-payroll", default_open: false };
pub const NAV_MASTER: NavSpec = NavSpec { key: "nav-master", default_open: false };

#[derive(Clone, Debug)]
struct Persisted {
    key: String,
    store: SharedStore,
}

#[derive(Clone, Debug)]
pub struct NavSection {
    open: bool,
    persisted: Option<Persisted>,
}

impl NavSection {
    /// Section that starts in `default_open` and forgets its state on reload.
    pub fn new(default_open: bool) -> Self {
        Self { open: default_open, persisted: None }
    }

    /// Section restored from `store` under `key` (already prefixed).
    pub fn persisted(store: SharedStore, key: String, default_open: bool) -> Self {
        let open = storage::read_flag(store.as_ref(), &key).unwrap_or(default_open);
        Self { open, persisted: Some(Persisted { key, store }) }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.persisted.as_ref().map(|p| p.key.as_str())
    }

    pub fn toggle(&mut self) {
        self.set_open(!self.open);
    }

    pub fn open_section(&mut self) {
        self.set_open(true);
    }

    pub fn close_section(&mut self) {
        self.set_open(false);
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
        if let Some(p) = &self.persisted {
            storage::write_flag(p.store.as_ref(), &p.key, open);
        }
    }
}
