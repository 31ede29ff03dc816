//! Client-side state records.
//!
//! DESIGN
//! ======
//! One small record per interactive fragment, grouped by kind so each
//! binding only depends on the record it drives. Records are plain values;
//! side effects go through the seams in [`crate::dom`] and
//! [`crate::storage`].

pub mod nav;
pub mod percentage;
pub mod quick_transaction;
pub mod selector;
pub mod toggle;
pub mod transaction_form;
