//! Core types and shared functionality for gamescrape.
//!
//! This crate provides:
//! - Unified error types
//! - Layered configuration
//! - Category identifiers and the typed records produced by extraction

pub mod category;
pub mod config;
pub mod error;
pub mod records;

pub use category::Category;
pub use config::{AppConfig, ConfigError};
pub use error::{Error, Result};
