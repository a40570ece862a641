//! Domain Layer - Core selector and stream-registry types.
//!
//! This layer contains the pure domain model for stream addressing
//! with no knowledge of any concrete exchange host or wire format.

/// Channel/market selector model and token classification.
pub mod selector;

/// Stream identifier registry.
pub mod registry;
