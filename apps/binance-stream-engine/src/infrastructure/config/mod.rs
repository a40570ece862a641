//! Configuration
//!
//! Environment-driven engine configuration. Credentials are explicit
//! configuration handed to the engine, never ambient process state.

mod settings;

pub use settings::{ConfigError, Credentials, EngineConfig};
