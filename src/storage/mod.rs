//! Storage layer for logkeep
//!
//! Provides atomic writes, bounded-retry file operations and the persisted
//! allow/deny identity lists.

pub mod file_io;
pub mod id_list;

pub use file_io::{read_json, safe_copy, safe_delete, safe_move, write_json_atomic, Retry};
pub use id_list::{read_id_list, write_id_list, ListStore};
