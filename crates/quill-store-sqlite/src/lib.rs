//! SQLite backend for the Quill key-value layer.
//!
//! [`SqliteKv`] implements [`quill_core::kv::KvStore`] over a single table, so
//! the whole blog lives in one database file.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteKv;
