//! Connection URI Synthesis
//!
//! Pure, deterministic translation from selectors to connection addresses.
//! No state is read or written here; the authenticated classic path (which
//! needs the registry and a session key) lives in
//! [`manager`](super::manager).
//!
//! # Address shapes
//!
//! - Classic aggregate: `wss://stream.binance.com:9443/ws/!miniTicker@arr`
//! - Classic user-data: `wss://stream.binance.com:9443/ws/<listen-key>`
//! - Chain single unit: `wss://dex.binance.org/api/ws/RAVEN-F66_BNB@trades`
//! - Chain wildcard:    `wss://dex.binance.org/api/ws/$all@allTickers`
//! - Chain account:     `wss://dex.binance.org/api/ws/<address>`
//! - Chain multi unit:  `wss://dex.binance.org/api/ws` (bare endpoint;
//!   subscription completes via payloads)

use crate::domain::selector::{
    ARR_MARKER, ChainChannelKind, Channel, GLOBAL_WILDCARD, MarketSelector, SelectorError,
    chain_channel_kind, classify_chain_wildcard, validate_chain_channels,
};

use super::Exchange;

// =============================================================================
// Result Type
// =============================================================================

/// Outcome of address synthesis.
///
/// `Unavailable` is a normal result value, not an error: it means "no URI
/// can be formed for this request right now" (missing credentials,
/// unregistered stream, or a selector combination the dialect cannot
/// address). Callers decide whether to retry, skip, or warn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamAddress {
    /// A fully formed connection URI.
    Uri(String),
    /// No URI can currently be formed.
    Unavailable,
}

impl StreamAddress {
    /// The URI, if one was formed.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Uri(uri) => Some(uri),
            Self::Unavailable => None,
        }
    }

    /// Check whether no URI could be formed.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

// =============================================================================
// Classic Dialect
// =============================================================================

/// Build the classic combined-stream URI for an aggregate tag.
#[must_use]
pub fn classic_aggregate_uri(exchange: Exchange, tag: &str) -> String {
    format!("{}{tag}@{ARR_MARKER}", exchange.websocket_base_uri())
}

/// Build the classic user-data URI from a resolved session key.
#[must_use]
pub fn classic_session_uri(exchange: Exchange, session_key: &str) -> String {
    format!("{}{session_key}", exchange.websocket_base_uri())
}

// =============================================================================
// Chain Dialect
// =============================================================================

/// Synthesize the chain-dialect connection address for a selector pair.
///
/// Single logical units (one channel, one market) are addressed directly in
/// the URI path; anything larger yields the bare endpoint, with the
/// subscription completed post-connect via
/// [`payload`](super::payload) messages.
///
/// # Errors
///
/// Returns [`SelectorError`] for empty selectors or unrecognized channel
/// tokens (caller contract violations). Recognized tokens in a combination
/// the dialect cannot address yield [`StreamAddress::Unavailable`].
pub fn chain_address(
    channels: &[Channel],
    markets: &MarketSelector,
) -> Result<StreamAddress, SelectorError> {
    if channels.is_empty() {
        return Err(SelectorError::EmptyChannels);
    }
    if markets.is_empty() {
        return Err(SelectorError::EmptyMarkets);
    }
    validate_chain_channels(channels)?;

    let endpoint = Exchange::BinanceOrg.websocket_base_uri();

    let address = match markets {
        MarketSelector::Address(account) => {
            if channels.len() == 1 {
                StreamAddress::Uri(format!("{endpoint}/{account}"))
            } else {
                // One URI cannot carry several account topics.
                StreamAddress::Uri(endpoint.to_string())
            }
        }
        MarketSelector::Symbols(symbols) if channels.len() == 1 && symbols.len() == 1 => {
            single_unit_address(endpoint, &channels[0], &symbols[0])
        }
        MarketSelector::Symbols(_) => StreamAddress::Uri(endpoint.to_string()),
    };

    Ok(address)
}

/// Address exactly one channel against exactly one market token.
fn single_unit_address(endpoint: &str, channel: &str, market: &str) -> StreamAddress {
    // Wildcard pairings are order-insensitive: ($all, allTickers) and
    // (allTickers, $all) address the same stream.
    if let Some(aggregate) = classify_chain_wildcard(channel, market) {
        return StreamAddress::Uri(format!("{endpoint}/{GLOBAL_WILDCARD}@{aggregate}"));
    }

    match chain_channel_kind(channel) {
        Some(ChainChannelKind::MarketData) => {
            StreamAddress::Uri(format!("{endpoint}/{market}@{channel}"))
        }
        // Recognized token, but the pairing is not addressable: an
        // aggregate channel without $all, an account channel against a
        // symbol list, or a stray $all.
        Some(ChainChannelKind::Aggregate | ChainChannelKind::Account) | None => {
            tracing::debug!(channel, market, "unaddressable chain selector combination");
            StreamAddress::Unavailable
        }
    }
}
