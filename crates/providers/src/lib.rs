//! LLM Provider implementations for Consilium.
//!
//! All providers implement the `consilium_core::Provider` trait.
//! The router builds the configured default provider.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::default_from_config;
