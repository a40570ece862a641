//! Stream Registry
//!
//! Process-wide mapping from stream identifier to the channel/market
//! selectors that created it. Payload synthesis needs to re-derive which
//! selectors belong to a live stream, so every registered stream keeps its
//! selector pair until it is torn down.
//!
//! # Invariants
//!
//! - A [`StreamId`], once registered, maps to an immutable selector pair
//!   until unregistered.
//! - No two live entries share a [`StreamId`].
//! - Each register/unregister is atomic with respect to lookup.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use super::selector::{Channel, MarketSelector};

// =============================================================================
// Types
// =============================================================================

/// Opaque unique identifier for one logical subscription session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(Uuid);

impl StreamId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Selector pair stored for one registered stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Channel tokens the stream was created with, in input order.
    pub channels: Vec<Channel>,
    /// Market side the stream was created with.
    pub markets: MarketSelector,
}

/// Registry lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The identifier was never registered or has been unregistered.
    #[error("stream {0} is not registered")]
    NotFound(StreamId),
}

// =============================================================================
// Stream Registry
// =============================================================================

/// Thread-safe registry of live stream identifiers.
///
/// A single process-wide lock is sufficient: none of the operations do I/O
/// or hold the lock across an await point.
#[derive(Debug, Default)]
pub struct StreamRegistry {
    streams: RwLock<HashMap<StreamId, RegistryEntry>>,
}

impl StreamRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh identifier and store the selector pair under it.
    pub fn register(&self, channels: Vec<Channel>, markets: MarketSelector) -> StreamId {
        let stream_id = StreamId::new();
        let entry = RegistryEntry { channels, markets };

        self.streams.write().insert(stream_id, entry);
        tracing::debug!(%stream_id, "registered stream");

        stream_id
    }

    /// Look up the selector pair registered under an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the identifier was never
    /// registered or has been unregistered.
    pub fn lookup(&self, stream_id: StreamId) -> Result<RegistryEntry, RegistryError> {
        self.streams
            .read()
            .get(&stream_id)
            .cloned()
            .ok_or(RegistryError::NotFound(stream_id))
    }

    /// Check whether an identifier is currently registered.
    #[must_use]
    pub fn contains(&self, stream_id: StreamId) -> bool {
        self.streams.read().contains_key(&stream_id)
    }

    /// Remove an identifier. Idempotent: unknown identifiers are a no-op.
    pub fn unregister(&self, stream_id: StreamId) {
        if self.streams.write().remove(&stream_id).is_some() {
            tracing::debug!(%stream_id, "unregistered stream");
        }
    }

    /// Number of live streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.read().len()
    }

    /// Check whether no streams are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.read().is_empty()
    }

    /// Snapshot of all live stream identifiers.
    #[must_use]
    pub fn stream_ids(&self) -> Vec<StreamId> {
        self.streams.read().keys().copied().collect()
    }
}
