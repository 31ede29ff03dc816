//! # finance-ui
//!
//! Client-side view-models for the accounting web app: named state records
//! bound to server-rendered markup, persisted sidebar sections, the
//! transaction entry forms, and the quick-transaction JSON submit.
//!
//! Records are registered by name up front so the markup never carries
//! inline expressions, which keeps the page working under a strict
//! content-security policy.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`registry`] | Component name → factory table, built once |
//! | [`binding`] | Properties and methods a bound element sees |
//! | [`state`] | The state records themselves |
//! | [`rebind`] | Destroy/re-init bindings after an htmx swap |
//! | [`dom`] | Element, form, input, page and event seams |
//! | [`storage`] | Key/value store for persisted flags |
//! | [`net`] | Wire types and the HTTP transport |
//! | [`format`] | Amount parsing and `id-ID` grouping |
//! | [`config`] | Routes, element ids and meta names |
//!
//! Browser glue (`Alpine.data` registration, `localStorage`, `fetch`, DOM
//! listeners, wasm exports) is compiled only with the `hydrate` feature.

pub mod binding;
pub mod config;
pub mod dom;
pub mod error;
pub mod format;
pub mod logging;
pub mod net;
pub mod rebind;
pub mod registry;
pub mod state;
pub mod storage;

#[cfg(feature = "hydrate")]
pub mod browser;

#[cfg(test)]
#[path = "fixtures_test.rs"]
mod fixtures;
