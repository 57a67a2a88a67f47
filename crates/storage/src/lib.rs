//! Storage layer for herbarium.
//!
//! SQLite-backed relational store for plants and their three bilingual
//! dimension tables, plus the on-disk image artifact store. All reads and
//! writes are synchronous; async callers wrap them in `spawn_blocking`.

mod error;
mod images;
mod migrations;
mod sqlite;

pub use error::StorageError;
pub use images::ImageStore;
pub use sqlite::{Dimension, Storage, StoreStats};
