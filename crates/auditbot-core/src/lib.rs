//! Core traits and types for AuditBot
//!
//! This crate defines the types shared across the AuditBot system: the
//! classification result every path produces, the LLM provider interface used
//! by the remote path, and the common error type.

pub mod classification;
pub mod error;
pub mod llm;

pub use classification::{ClassificationResult, ClassificationSource};
pub use error::{Error, Result};
pub use llm::{GenerationConfig, GenerationResult, LLMProvider};
