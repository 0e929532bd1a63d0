//! Configuration module for the processor.
//!
//! Provides environment-backed settings and dependency initialization.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::ProcessorConfig;
