//! Foundation types for arcshell.
//!
//! Shared by every arcshell crate: the error type with its `Result` alias,
//! and the TOML-backed shell configuration.

pub mod config;
pub mod error;

pub use config::ShellConfig;
pub use error::{Result, ShellError};
