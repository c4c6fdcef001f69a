// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`] mirrors the TOML layout (`RawConfigFile`) and the checked form
//!   (`ConfigFile`) the rest of the crate consumes.
//! - [`validate`] turns the former into the latter.
//! - [`loader`] reads files from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, ExecSection, RawConfigFile, RetrySection};
