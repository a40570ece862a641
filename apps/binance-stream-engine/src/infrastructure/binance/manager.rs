//! Stream Manager
//!
//! Facade over the stream registry, the per-dialect address synthesizers,
//! and the session-key port. One manager addresses exactly one exchange
//! dialect, chosen at construction; all synthesis is deterministic given
//! identical inputs.
//!
//! # Example
//!
//! ```
//! use binance_stream_engine::{Exchange, MarketSelector, StreamManager};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let manager = StreamManager::new(Exchange::BinanceCom);
//! let address = manager
//!     .create_uri(
//!         &["!miniTicker".to_string()],
//!         &MarketSelector::symbols(["arr"]),
//!         None,
//!         None,
//!     )
//!     .await
//!     .unwrap();
//!
//! assert_eq!(
//!     address.uri(),
//!     Some("wss://stream.binance.com:9443/ws/!miniTicker@arr")
//! );
//! # }
//! ```

use std::sync::Arc;

use crate::application::ports::SessionKeyProvider;
use crate::domain::registry::{RegistryError, StreamId, StreamRegistry};
use crate::domain::selector::{
    Channel, ClassicRequest, MarketSelector, SelectorError, classify_classic,
};
use crate::infrastructure::config::Credentials;

use super::Exchange;
use super::payload::{Method, PayloadMessage, build_payloads};
use super::uri::{StreamAddress, chain_address, classic_aggregate_uri, classic_session_uri};

// =============================================================================
// Error Type
// =============================================================================

/// Errors surfaced by the payload path of the manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Caller supplied empty or malformed selectors.
    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),

    /// Caller supplied a stream identifier the registry does not know.
    #[error(transparent)]
    StreamNotFound(#[from] RegistryError),

    /// Control payloads only exist in the chain dialect.
    #[error("payload subscription is not supported on {0}")]
    UnsupportedExchange(Exchange),
}

// =============================================================================
// Stream Manager
// =============================================================================

/// Synthesizes stream addresses and control payloads for one exchange.
///
/// The registry is the only mutable state and is safe for concurrent use;
/// every synthesis path is pure apart from the optional session-key
/// resolution, which is the single operation that may await.
pub struct StreamManager {
    exchange: Exchange,
    registry: StreamRegistry,
    session_keys: Option<Arc<dyn SessionKeyProvider>>,
}

impl StreamManager {
    /// Create a manager for the given exchange dialect.
    #[must_use]
    pub fn new(exchange: Exchange) -> Self {
        Self {
            exchange,
            registry: StreamRegistry::new(),
            session_keys: None,
        }
    }

    /// Attach a session-key provider for authenticated user-data streams.
    ///
    /// Without a provider, user-data requests resolve to
    /// [`StreamAddress::Unavailable`].
    #[must_use]
    pub fn with_session_key_provider(mut self, provider: Arc<dyn SessionKeyProvider>) -> Self {
        self.session_keys = Some(provider);
        self
    }

    /// The exchange this manager addresses.
    #[must_use]
    pub const fn exchange(&self) -> Exchange {
        self.exchange
    }

    /// The registry of live stream identifiers.
    #[must_use]
    pub const fn registry(&self) -> &StreamRegistry {
        &self.registry
    }

    /// Register a new logical stream and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] if either selector is empty.
    pub fn create_stream(
        &self,
        channels: &[Channel],
        markets: &MarketSelector,
    ) -> Result<StreamId, SelectorError> {
        if channels.is_empty() {
            return Err(SelectorError::EmptyChannels);
        }
        if markets.is_empty() {
            return Err(SelectorError::EmptyMarkets);
        }

        Ok(self.registry.register(channels.to_vec(), markets.clone()))
    }

    /// Tear down a logical stream. Idempotent.
    pub fn stop_stream(&self, stream_id: StreamId) {
        self.registry.unregister(stream_id);
    }

    /// Synthesize the connection URI for a selector pair.
    ///
    /// `stream_id` and `credentials` are only consulted for the classic
    /// dialect's authenticated user-data channel; the method awaits only on
    /// that path (session-key resolution).
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] for empty selectors or unrecognized chain
    /// channel tokens. Requests that are well-formed but cannot currently
    /// be addressed yield `Ok(StreamAddress::Unavailable)`.
    pub async fn create_uri(
        &self,
        channels: &[Channel],
        markets: &MarketSelector,
        stream_id: Option<StreamId>,
        credentials: Option<&Credentials>,
    ) -> Result<StreamAddress, SelectorError> {
        if channels.is_empty() {
            return Err(SelectorError::EmptyChannels);
        }
        if markets.is_empty() {
            return Err(SelectorError::EmptyMarkets);
        }

        if self.exchange.is_chain() {
            return chain_address(channels, markets);
        }

        let market_tokens = match markets {
            MarketSelector::Symbols(symbols) => symbols.as_slice(),
            MarketSelector::Address(address) => std::slice::from_ref(address),
        };

        match classify_classic(channels, market_tokens) {
            ClassicRequest::Aggregate { tag } => {
                Ok(StreamAddress::Uri(classic_aggregate_uri(self.exchange, &tag)))
            }
            ClassicRequest::UserData => Ok(self.user_data_uri(stream_id, credentials).await),
            ClassicRequest::Unrecognized => {
                tracing::debug!(
                    exchange = %self.exchange,
                    ?channels,
                    "unrecognized classic selector combination"
                );
                Ok(StreamAddress::Unavailable)
            }
        }
    }

    /// Build the ordered control-payload list for a registered stream.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::StreamNotFound`] for unknown identifiers,
    /// [`EngineError::InvalidSelector`] for malformed selectors, and
    /// [`EngineError::UnsupportedExchange`] on the classic dialects.
    pub fn create_payload(
        &self,
        stream_id: StreamId,
        method: Method,
        channels: &[Channel],
        markets: &MarketSelector,
    ) -> Result<Vec<PayloadMessage>, EngineError> {
        if !self.exchange.is_chain() {
            return Err(EngineError::UnsupportedExchange(self.exchange));
        }

        self.registry.lookup(stream_id)?;

        Ok(build_payloads(method, channels, markets)?)
    }

    /// Resolve the authenticated user-data URI, or `Unavailable`.
    ///
    /// Requires a registered stream, complete credentials, and a configured
    /// session-key provider; any missing piece or resolution failure is an
    /// expected outcome, never an error.
    async fn user_data_uri(
        &self,
        stream_id: Option<StreamId>,
        credentials: Option<&Credentials>,
    ) -> StreamAddress {
        let Some(stream_id) = stream_id else {
            tracing::debug!("user-data request without a stream id");
            return StreamAddress::Unavailable;
        };

        if !self.registry.contains(stream_id) {
            tracing::debug!(%stream_id, "user-data request for an unregistered stream");
            return StreamAddress::Unavailable;
        }

        let Some(credentials) = credentials.filter(|c| c.is_complete()) else {
            tracing::debug!(%stream_id, "user-data request without complete credentials");
            return StreamAddress::Unavailable;
        };

        let Some(provider) = &self.session_keys else {
            tracing::debug!(%stream_id, "no session-key provider configured");
            return StreamAddress::Unavailable;
        };

        match provider
            .resolve(credentials.api_key(), credentials.api_secret())
            .await
        {
            Ok(session_key) if !session_key.is_empty() => {
                StreamAddress::Uri(classic_session_uri(self.exchange, &session_key))
            }
            Ok(_) => {
                tracing::debug!(%stream_id, "session-key provider returned an empty key");
                StreamAddress::Unavailable
            }
            Err(error) => {
                tracing::debug!(%stream_id, %error, "session-key resolution failed");
                StreamAddress::Unavailable
            }
        }
    }
}

impl std::fmt::Debug for StreamManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamManager")
            .field("exchange", &self.exchange)
            .field("registry", &self.registry)
            .field("session_keys", &self.session_keys.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockSessionKeyProvider, SessionKeyError};

    fn channels(items: &[&str]) -> Vec<Channel> {
        items.iter().map(ToString::to_string).collect()
    }

    fn creds() -> Credentials {
        Credentials::new("api_key".to_string(), "api_secret".to_string())
    }

    async fn uri(
        manager: &StreamManager,
        left: &[&str],
        right: &[&str],
    ) -> StreamAddress {
        manager
            .create_uri(
                &channels(left),
                &MarketSelector::symbols(right.iter().copied()),
                None,
                None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn classic_miniticker_regular_and_reverse() {
        let manager = StreamManager::new(Exchange::BinanceCom);

        let expected = StreamAddress::Uri(
            "wss://stream.binance.com:9443/ws/!miniTicker@arr".to_string(),
        );
        assert_eq!(uri(&manager, &["!miniTicker"], &["arr"]).await, expected);
        assert_eq!(uri(&manager, &["arr"], &["!miniTicker"]).await, expected);
    }

    #[tokio::test]
    async fn classic_ticker_on_both_hosts() {
        let com = StreamManager::new(Exchange::BinanceCom);
        let je = StreamManager::new(Exchange::BinanceJe);

        assert_eq!(
            uri(&com, &["!ticker"], &["arr"]).await,
            StreamAddress::Uri("wss://stream.binance.com:9443/ws/!ticker@arr".to_string())
        );
        assert_eq!(
            uri(&je, &["!ticker"], &["arr"]).await,
            StreamAddress::Uri("wss://stream.binance.je:9443/ws/!ticker@arr".to_string())
        );
    }

    #[tokio::test]
    async fn classic_unrecognized_combination_is_unavailable() {
        let manager = StreamManager::new(Exchange::BinanceCom);
        assert!(uri(&manager, &["trade"], &["btcusdt"]).await.is_unavailable());
    }

    #[tokio::test]
    async fn userdata_without_stream_or_credentials_is_unavailable() {
        let manager = StreamManager::new(Exchange::BinanceCom);
        assert!(uri(&manager, &["!userData"], &["arr"]).await.is_unavailable());
        assert!(uri(&manager, &["arr"], &["!userData"]).await.is_unavailable());
    }

    #[tokio::test]
    async fn userdata_resolves_session_key() {
        let mut provider = MockSessionKeyProvider::new();
        provider
            .expect_resolve()
            .returning(|_, _| Ok("listen_key_123".to_string()));

        let manager = StreamManager::new(Exchange::BinanceCom)
            .with_session_key_provider(Arc::new(provider));

        let selectors = (channels(&["!userData"]), MarketSelector::symbols(["arr"]));
        let stream_id = manager
            .create_stream(&selectors.0, &selectors.1)
            .unwrap();

        let address = manager
            .create_uri(&selectors.0, &selectors.1, Some(stream_id), Some(&creds()))
            .await
            .unwrap();

        assert_eq!(
            address,
            StreamAddress::Uri(
                "wss://stream.binance.com:9443/ws/listen_key_123".to_string()
            )
        );
    }

    #[tokio::test]
    async fn userdata_reverse_arguments_resolve_identically() {
        let mut provider = MockSessionKeyProvider::new();
        provider
            .expect_resolve()
            .returning(|_, _| Ok("listen_key_123".to_string()));

        let manager = StreamManager::new(Exchange::BinanceCom)
            .with_session_key_provider(Arc::new(provider));

        let chans = channels(&["arr"]);
        let markets = MarketSelector::symbols(["!userData"]);
        let stream_id = manager.create_stream(&chans, &markets).unwrap();

        let address = manager
            .create_uri(&chans, &markets, Some(stream_id), Some(&creds()))
            .await
            .unwrap();

        assert_eq!(
            address.uri(),
            Some("wss://stream.binance.com:9443/ws/listen_key_123")
        );
    }

    #[tokio::test]
    async fn userdata_with_unregistered_stream_is_unavailable() {
        let mut provider = MockSessionKeyProvider::new();
        provider.expect_resolve().never();

        let manager = StreamManager::new(Exchange::BinanceCom)
            .with_session_key_provider(Arc::new(provider));

        let address = manager
            .create_uri(
                &channels(&["!userData"]),
                &MarketSelector::symbols(["arr"]),
                Some(StreamId::new()),
                Some(&creds()),
            )
            .await
            .unwrap();

        assert!(address.is_unavailable());
    }

    #[tokio::test]
    async fn userdata_with_incomplete_credentials_is_unavailable() {
        let mut provider = MockSessionKeyProvider::new();
        provider.expect_resolve().never();

        let manager = StreamManager::new(Exchange::BinanceCom)
            .with_session_key_provider(Arc::new(provider));

        let chans = channels(&["!userData"]);
        let markets = MarketSelector::symbols(["arr"]);
        let stream_id = manager.create_stream(&chans, &markets).unwrap();

        let empty = Credentials::new(String::new(), String::new());
        let address = manager
            .create_uri(&chans, &markets, Some(stream_id), Some(&empty))
            .await
            .unwrap();

        assert!(address.is_unavailable());
    }

    #[tokio::test]
    async fn userdata_resolution_failure_is_unavailable() {
        let mut provider = MockSessionKeyProvider::new();
        provider
            .expect_resolve()
            .returning(|_, _| Err(SessionKeyError::Timeout));

        let manager = StreamManager::new(Exchange::BinanceCom)
            .with_session_key_provider(Arc::new(provider));

        let chans = channels(&["!userData"]);
        let markets = MarketSelector::symbols(["arr"]);
        let stream_id = manager.create_stream(&chans, &markets).unwrap();

        let address = manager
            .create_uri(&chans, &markets, Some(stream_id), Some(&creds()))
            .await
            .unwrap();

        assert!(address.is_unavailable());
    }

    #[tokio::test]
    async fn userdata_without_provider_is_unavailable() {
        let manager = StreamManager::new(Exchange::BinanceCom);

        let chans = channels(&["!userData"]);
        let markets = MarketSelector::symbols(["arr"]);
        let stream_id = manager.create_stream(&chans, &markets).unwrap();

        let address = manager
            .create_uri(&chans, &markets, Some(stream_id), Some(&creds()))
            .await
            .unwrap();

        assert!(address.is_unavailable());
    }

    #[tokio::test]
    async fn chain_dialect_delegates_to_chain_synthesis() {
        let manager = StreamManager::new(Exchange::BinanceOrg);

        assert_eq!(
            uri(&manager, &["trades"], &["RAVEN-F66_BNB"]).await,
            StreamAddress::Uri(
                "wss://dex.binance.org/api/ws/RAVEN-F66_BNB@trades".to_string()
            )
        );
    }

    #[tokio::test]
    async fn create_uri_is_idempotent() {
        let manager = StreamManager::new(Exchange::BinanceOrg);

        let first = uri(&manager, &["trades", "kline_1h"], &["S1", "S2"]).await;
        let second = uri(&manager, &["trades", "kline_1h"], &["S1", "S2"]).await;

        assert_eq!(first, second);
    }

    #[test]
    fn create_stream_validates_selectors() {
        let manager = StreamManager::new(Exchange::BinanceOrg);

        assert_eq!(
            manager.create_stream(&[], &MarketSelector::symbols(["X"])),
            Err(SelectorError::EmptyChannels)
        );
        assert_eq!(
            manager.create_stream(&channels(&["trades"]), &MarketSelector::Symbols(vec![])),
            Err(SelectorError::EmptyMarkets)
        );
    }

    #[test]
    fn create_payload_requires_chain_dialect() {
        let manager = StreamManager::new(Exchange::BinanceCom);
        let result = manager.create_payload(
            StreamId::new(),
            Method::Subscribe,
            &channels(&["trades"]),
            &MarketSelector::symbols(["RAVEN-F66_BNB"]),
        );

        assert_eq!(
            result,
            Err(EngineError::UnsupportedExchange(Exchange::BinanceCom))
        );
    }

    #[test]
    fn create_payload_requires_registered_stream() {
        let manager = StreamManager::new(Exchange::BinanceOrg);
        let unknown = StreamId::new();

        let result = manager.create_payload(
            unknown,
            Method::Subscribe,
            &channels(&["trades"]),
            &MarketSelector::symbols(["RAVEN-F66_BNB"]),
        );

        assert_eq!(
            result,
            Err(EngineError::StreamNotFound(RegistryError::NotFound(unknown)))
        );
    }

    #[test]
    fn stop_stream_is_idempotent() {
        let manager = StreamManager::new(Exchange::BinanceOrg);
        let stream_id = manager
            .create_stream(
                &channels(&["trades"]),
                &MarketSelector::symbols(["RAVEN-F66_BNB"]),
            )
            .unwrap();

        manager.stop_stream(stream_id);
        manager.stop_stream(stream_id);

        assert!(manager.registry().is_empty());
    }
}
