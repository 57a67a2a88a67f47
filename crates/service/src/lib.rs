//! Service layer for herbarium.
//!
//! `PlantService` couples the validation layer, dimension resolution, the
//! image artifact store, and the plant repository into whole-record
//! operations. `Translator` is the display-only translation collaborator
//! with its pluggable cache.

mod error;
mod plants;
mod translation;

pub use error::ServiceError;
pub use plants::{ImageUpload, PlantService};
pub use translation::{HttpTranslateBackend, TranslateBackend, Translator};
