//! SQLite backend for the moim party board.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Implements the four store traits from
//! `moim-core`; every backend fault is surfaced to the engines as
//! [`moim_core::Error::Store`].

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
