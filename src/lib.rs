//! Primer Application Library
//!
//! This library provides the application modules for the tutorial catalog
//! service.

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
