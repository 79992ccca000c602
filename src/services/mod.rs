//! Service layer for logkeep
//!
//! The service layer holds the reconciliation of observed logs with the
//! user's enabled and disabled lists.

pub mod ordering;
pub mod reconciliation;

pub use reconciliation::{reconcile_entries, EntryReconciler, Reconciliation};
