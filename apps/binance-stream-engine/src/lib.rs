#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access
    )
)]

//! Binance Stream Engine - Addressing & Payload Synthesis
//!
//! Synthesizes exchange-specific WebSocket connection URIs and
//! subscribe/unsubscribe control payloads for the three Binance streaming
//! dialects: `binance.com` and `binance.je` (classic combined streams) and
//! `binance.org` (chain/DEX push subscriptions). The transport layer that
//! opens sockets and sends frames lives outside this crate and consumes the
//! engine through [`StreamManager`].
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure selector model and the stream registry
//!   - `selector`: channel/market selectors and token classification
//!   - `registry`: stream-ID → selector-pair mapping
//!
//! - **Application**: Port definitions
//!   - `ports`: session-key resolution against the exchange's REST API
//!
//! - **Infrastructure**: Exchange adapters and configuration
//!   - `binance`: dialect table, URI synthesis, payload building, manager
//!   - `config`: environment-driven settings
//!
//! # Control Flow
//!
//! ```text
//! create_stream ──► Registry (StreamId ──► selectors)
//!                      │
//! create_uri ──────────┼──► URI, or Unavailable, or bare chain endpoint
//!                      │
//! create_payload ──────┴──► ordered subscribe/unsubscribe payload list
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Selector model and stream registry.
pub mod domain;

/// Application layer - Port definitions.
pub mod application;

/// Infrastructure layer - Exchange adapters and configuration.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::registry::{RegistryEntry, RegistryError, StreamId, StreamRegistry};
pub use domain::selector::{Channel, MarketSelector, SelectorError, Symbol};

// Ports
pub use application::ports::{SessionKey, SessionKeyError, SessionKeyProvider};

// Binance adapters
pub use infrastructure::binance::Exchange;
pub use infrastructure::binance::manager::{EngineError, StreamManager};
pub use infrastructure::binance::payload::{Method, PayloadMessage};
pub use infrastructure::binance::uri::StreamAddress;

// Configuration
pub use infrastructure::config::{ConfigError, Credentials, EngineConfig};
