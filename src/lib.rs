//! bookmark-store: a versioned, indexed local bookmark store.
//!
//! Bookmarks live in one SQLite table keyed by id, with a unique URL index
//! and two ordering indexes that drive newest-first pagination and URL
//! substring search. This library crate exposes all modules for use by the
//! RPC binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod types;
