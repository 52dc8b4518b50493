//! Common utilities module
//!
//! This module contains shared utilities used across the deblurring pipeline.

pub mod error;

pub use error::{DeblurError, Result};
