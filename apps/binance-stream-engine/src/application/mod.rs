//! Application Layer - Port definitions.
//!
//! This layer contains the port interfaces that define how the engine
//! interacts with external systems.

/// Port interfaces for external systems (session-key resolution).
pub mod ports;
