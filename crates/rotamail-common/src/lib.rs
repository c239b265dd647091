//! RotaMail Common - Shared types and utilities
//!
//! This crate provides common types, configuration, and the workspace
//! error type shared across all RotaMail components.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
