//! Infrastructure Layer - Exchange adapters and configuration.
//!
//! This layer contains the Binance-specific wire knowledge (hosts, URI
//! shapes, payload formats) and environment-driven configuration.

/// Binance dialect definitions, URI synthesis, and payload building.
pub mod binance;

/// Configuration loaded from environment variables.
pub mod config;
