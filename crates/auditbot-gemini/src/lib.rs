//! Gemini integration for AuditBot
//!
//! This crate provides the Gemini implementation of the LLMProvider trait,
//! used by the classifier gateway for remote classification.

mod client;
mod config;


pub use client::GeminiClient;
pub use config::{GeminiConfig, PLACEHOLDER_API_KEY};

// Re-export core types for convenience
pub use auditbot_core::{
    LLMProvider, GenerationConfig, GenerationResult, Error, Result,
};
