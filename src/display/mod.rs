//! Display formatting for terminal output
//!
//! Provides utilities for formatting the snapshot, the lists and backup
//! slots as plain-text tables.

pub mod entries;
pub mod slots;

pub use entries::{format_entry_list, format_lists};
pub use slots::{format_pass_report, format_size, format_slot_list, SlotInfo};
