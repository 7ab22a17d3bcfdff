//! SQLite backend for jobmatch.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. [`SqliteStore`] implements all three
//! workflow collaborators: the provisioning store, a local agent-provisioning
//! function and account creation.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
