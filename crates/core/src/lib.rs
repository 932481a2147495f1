//! # Consilium Core
//!
//! Domain types, traits, and error definitions for the Consilium
//! council-decision assistant. This crate has **no framework dependencies**:
//! it defines the domain model that all other crates implement against.
//!
//! The language model is reached only through the [`Provider`] trait, so
//! every pipeline stage can be exercised with scripted test doubles.

pub mod error;
pub mod message;
pub mod provider;
pub mod record;
pub mod taxonomy;

// Re-export key types at crate root for ergonomics
pub use error::{ClassificationError, Error, ExtractionError, ProviderError, Result, StoreError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, SamplingConfig, Usage};
pub use record::{HclId, Record};
pub use taxonomy::{Category, CategoryDef, Language, Taxonomy, TIMPARK_CATEGORY};
