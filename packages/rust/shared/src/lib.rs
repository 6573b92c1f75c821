//! Shared types, error model, and configuration for qaextract.
//!
//! This crate is the foundation depended on by all other qaextract crates.
//! It provides:
//! - [`QaExtractError`], the unified error type
//! - Domain types ([`QaPair`], [`ParseOutcome`], [`ChatRecord`])
//! - Configuration ([`AppConfig`], [`ConvertConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConvertConfig, InputConfig, OutputConfig, PromptConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{QaExtractError, Result};
pub use types::{ChatMessage, ChatRecord, DEFAULT_SYSTEM_PROMPT, ParseOutcome, QaPair, Role};
