//! Chain Dialect Control Payloads
//!
//! Wire format types for the post-connect subscribe/unsubscribe messages of
//! the chain (DEX) dialect. Field order in the serialized JSON is fixed by
//! struct declaration order (`method`, then `topic`/`symbols`/`address`),
//! and the payload variants are distinguished by field presence, never by
//! null values. The exchange requires this exact shape.
//!
//! # Teardown asymmetry
//!
//! Symbol-scoped unsubscription does not mirror subscription: the exchange
//! expects the full symbol list dropped as one unit first, then each topic
//! dropped one by one. [`build_payloads`] preserves that ordering exactly.

use serde::Serialize;

use crate::domain::selector::{
    ChainChannelKind, Channel, MarketSelector, SelectorError, Symbol, chain_channel_kind,
};

// =============================================================================
// Wire Types
// =============================================================================

/// Control-message method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Open a subscription.
    Subscribe,
    /// Close a subscription.
    Unsubscribe,
}

impl Method {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
        }
    }
}

/// One control message in a subscribe/unsubscribe payload list.
///
/// # Wire Format (JSON)
/// ```json
/// {"method":"subscribe","topic":"trades","symbols":["RAVEN-F66_BNB"]}
/// {"method":"subscribe","topic":"orders","address":"bnb1v566f3..."}
/// {"method":"unsubscribe","symbols":["RAVEN-F66_BNB"]}
/// {"method":"unsubscribe","topic":"trades"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadMessage {
    /// Control method.
    pub method: Method,

    /// Channel topic, absent on the bulk symbol-drop message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Channel>,

    /// Symbol list, absent on account-scoped and per-topic-drop messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<Symbol>>,

    /// Account address, present only on account-scoped messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PayloadMessage {
    /// Topic + symbol list message (symbol-scoped subscribe).
    #[must_use]
    pub const fn topic_symbols(method: Method, topic: Channel, symbols: Vec<Symbol>) -> Self {
        Self {
            method,
            topic: Some(topic),
            symbols: Some(symbols),
            address: None,
        }
    }

    /// Topic + address message (account-scoped).
    #[must_use]
    pub const fn topic_address(method: Method, topic: Channel, address: String) -> Self {
        Self {
            method,
            topic: Some(topic),
            symbols: None,
            address: Some(address),
        }
    }

    /// Bulk symbol list message with no topic (symbol-scoped unsubscribe).
    #[must_use]
    pub const fn symbols_only(method: Method, symbols: Vec<Symbol>) -> Self {
        Self {
            method,
            topic: None,
            symbols: Some(symbols),
            address: None,
        }
    }

    /// Topic-only message (symbol-scoped unsubscribe).
    #[must_use]
    pub const fn topic_only(method: Method, topic: Channel) -> Self {
        Self {
            method,
            topic: Some(topic),
            symbols: None,
            address: None,
        }
    }

    /// Serialize to the JSON text frame sent over the socket.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (should not happen with
    /// valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Payload Builder
// =============================================================================

/// Build the ordered control-message list for a chain-dialect subscription.
///
/// - Account-scoped channels: one `{method, topic, address}` object per
///   channel, in input order, for both methods.
/// - Symbol-scoped subscribe: one `{method, topic, symbols}` object per
///   channel, in input order, each carrying the full symbol list.
/// - Symbol-scoped unsubscribe: a single `{method, symbols}` object first,
///   then one `{method, topic}` object per channel in input order.
///
/// # Errors
///
/// Returns [`SelectorError`] for empty selectors, unrecognized channel
/// tokens, or channels that do not match the market selector's shape.
pub fn build_payloads(
    method: Method,
    channels: &[Channel],
    markets: &MarketSelector,
) -> Result<Vec<PayloadMessage>, SelectorError> {
    if channels.is_empty() {
        return Err(SelectorError::EmptyChannels);
    }
    if markets.is_empty() {
        return Err(SelectorError::EmptyMarkets);
    }

    match markets {
        MarketSelector::Address(address) => {
            require_kind(channels, ChainChannelKind::Account)?;

            Ok(channels
                .iter()
                .map(|channel| {
                    PayloadMessage::topic_address(method, channel.clone(), address.clone())
                })
                .collect())
        }
        MarketSelector::Symbols(symbols) => {
            require_kind(channels, ChainChannelKind::MarketData)?;

            match method {
                Method::Subscribe => Ok(channels
                    .iter()
                    .map(|channel| {
                        PayloadMessage::topic_symbols(method, channel.clone(), symbols.clone())
                    })
                    .collect()),
                Method::Unsubscribe => {
                    // Symbols are dropped as one unit before topics are
                    // dropped one-by-one.
                    let mut payloads = Vec::with_capacity(channels.len() + 1);
                    payloads.push(PayloadMessage::symbols_only(method, symbols.clone()));
                    payloads.extend(
                        channels
                            .iter()
                            .map(|channel| PayloadMessage::topic_only(method, channel.clone())),
                    );
                    Ok(payloads)
                }
            }
        }
    }
}

/// Check every channel token against the kind the market selector implies.
fn require_kind(channels: &[Channel], kind: ChainChannelKind) -> Result<(), SelectorError> {
    for channel in channels {
        match chain_channel_kind(channel) {
            Some(found) if found == kind => {}
            Some(_) => return Err(SelectorError::ShapeMismatch(channel.clone())),
            None => return Err(SelectorError::UnknownChannel(channel.clone())),
        }
    }
    Ok(())
}
