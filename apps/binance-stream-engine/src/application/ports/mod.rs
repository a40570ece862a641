//! Port Interfaces
//!
//! Interfaces (ports) for external systems following the Hexagonal
//! Architecture pattern. Infrastructure adapters implement these contracts.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`SessionKeyProvider`]: resolves a listen/session key for
//!   authenticated user-data streams via the exchange's REST API.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Short-lived authenticated token required to open a user-data stream.
pub type SessionKey = String;

/// Failure of the external session-key resolution call.
///
/// Always recoverable: the synthesizer collapses any of these into an
/// "unavailable" address; the caller decides whether to retry or skip.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionKeyError {
    /// The REST request failed.
    #[error("session key request failed: {0}")]
    Request(String),

    /// The REST request timed out.
    #[error("session key request timed out")]
    Timeout,

    /// The exchange answered with an empty key.
    #[error("exchange returned an empty session key")]
    Empty,
}

/// Resolves a listen/session key from API credentials.
///
/// Implemented outside this crate against the exchange's REST API. The
/// `resolve` call is the only operation in the engine that may block;
/// callers can wrap it in `tokio::time::timeout` and treat a timeout as a
/// resolution failure.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionKeyProvider: Send + Sync {
    /// Resolve a session key for the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SessionKeyError`] if the external call fails, times out,
    /// or yields an unusable key.
    async fn resolve(&self, api_key: &str, api_secret: &str)
    -> Result<SessionKey, SessionKeyError>;
}
