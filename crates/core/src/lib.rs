//! Core domain types and constants for herbarium.
//!
//! Defines the bilingual plant record, the per-operation input records the
//! validation layer produces, the process-wide configuration struct, and the
//! key-value cache abstraction used by the translation collaborator.

mod cache;
mod config;
mod error;
mod types;
pub mod validate;

pub use cache::{Cache, MemoryCache};
pub use config::Config;
pub use error::ValidationError;
pub use types::{CreatePlant, Language, Plant, PlantForm, SortOrder, UpdatePlant};
