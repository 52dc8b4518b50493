//! Configuration module
//!
//! This module provides the validated run configuration and its settings
//! file loader.

mod loader;
pub mod types;

pub use loader::SettingsFormat;
pub use types::{DeblurConfig, DeblurConfigBuilder, NoiseConfig, PsfSpec};
