//! Core types, store traits, and engines for the moim party board.
//!
//! Everything here is transport- and storage-agnostic: the engines talk to
//! the [`store`] traits, and the HTTP and SQLite layers live in sibling
//! crates that depend on this one.

mod access;

pub mod bookmark;
pub mod error;
pub mod join;
pub mod lifecycle;
pub mod listing;
pub mod membership;
pub mod memory;
pub mod party;
pub mod store;
pub mod user;

pub use error::{Error, Result};
