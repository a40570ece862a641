//! Selector Model and Token Classification
//!
//! Domain types for the channel/market selectors a subscription is built
//! from, plus the classification rules the per-dialect synthesizers share.
//!
//! # Design
//!
//! The classic dialect accepts its two selector arguments in either order:
//! one side carries an aggregate tag (`!miniTicker`, `!ticker`), the other
//! the combined-stream marker (`arr`). Rather than special-casing the two
//! call orders, each side is classified independently and the pair of
//! classifications is matched afterwards. The chain dialect reuses the same
//! idea for its `$all` wildcard pairings.

use serde::Serialize;

// =============================================================================
// Types
// =============================================================================

/// A channel token (e.g. `trades`, `kline_1h`, `!miniTicker`).
pub type Channel = String;

/// A market/symbol string (e.g. `RAVEN-F66_BNB`).
pub type Symbol = String;

/// Market side of a subscription.
///
/// Account-scoped chain channels subscribe against a single account address
/// rather than a symbol list; the two shapes are distinct at the type level
/// so the synthesizer never has to guess which one it was handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MarketSelector {
    /// Ordered sequence of market symbols (or classic-dialect tokens).
    Symbols(Vec<Symbol>),
    /// A single account address (chain dialect, account-scoped channels).
    Address(String),
}

impl MarketSelector {
    /// Build a symbol-list selector.
    pub fn symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self::Symbols(symbols.into_iter().map(Into::into).collect())
    }

    /// Build an account-address selector.
    pub fn address(address: impl Into<String>) -> Self {
        Self::Address(address.into())
    }

    /// Check whether the selector carries no usable input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Symbols(symbols) => symbols.is_empty(),
            Self::Address(address) => address.is_empty(),
        }
    }

    /// Number of logical units on the market side.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Symbols(symbols) => symbols.len(),
            Self::Address(_) => 1,
        }
    }
}

// =============================================================================
// Reserved Tokens
// =============================================================================

/// Classic-dialect combined/array stream marker.
pub const ARR_MARKER: &str = "arr";

/// Classic-dialect authenticated user-data channel.
pub const USER_DATA: &str = "!userData";

/// Classic-dialect "all mini-tickers" aggregate tag.
pub const ALL_MINI_TICKERS_TAG: &str = "!miniTicker";

/// Classic-dialect "all tickers" aggregate tag.
pub const ALL_TICKERS_TAG: &str = "!ticker";

/// Chain-dialect global wildcard market marker.
pub const GLOBAL_WILDCARD: &str = "$all";

// =============================================================================
// Errors
// =============================================================================

/// Caller contract violations in selector input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// Channel list was empty.
    #[error("channel selector cannot be empty")]
    EmptyChannels,

    /// Market list or address was empty.
    #[error("market selector cannot be empty")]
    EmptyMarkets,

    /// Channel token is not part of the dialect's channel set.
    #[error("unrecognized channel token: {0}")]
    UnknownChannel(String),

    /// Recognized channel paired with the wrong market-selector shape
    /// (e.g. an account channel against a symbol list).
    #[error("channel {0} does not match the market selector shape")]
    ShapeMismatch(String),
}

// =============================================================================
// Classic Dialect Classification
// =============================================================================

/// Classification of one classic-dialect selector argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassicToken {
    /// Carries an aggregate "all symbols" tag; the tag itself is kept.
    Aggregate(String),
    /// Carries the combined/array stream marker.
    Arr,
    /// Carries the authenticated user-data channel.
    UserData,
    /// Nothing the classic dialect recognizes.
    Other,
}

/// Combined classification of both classic-dialect arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassicRequest {
    /// Aggregate tag on one side, ARR marker on the other (either order).
    Aggregate {
        /// The aggregate tag (`!miniTicker` or `!ticker`).
        tag: String,
    },
    /// Either side asked for the user-data channel.
    UserData,
    /// No combination the classic dialect can address.
    Unrecognized,
}

/// Classify a single classic-dialect selector argument.
///
/// User data wins over the other tokens: a request naming `!userData`
/// anywhere is an authenticated request regardless of what else rides along.
#[must_use]
pub fn classify_classic_side(tokens: &[Channel]) -> ClassicToken {
    if tokens.iter().any(|t| t == USER_DATA) {
        return ClassicToken::UserData;
    }
    if let Some(tag) = tokens
        .iter()
        .find(|t| *t == ALL_MINI_TICKERS_TAG || *t == ALL_TICKERS_TAG)
    {
        return ClassicToken::Aggregate(tag.clone());
    }
    if tokens.iter().any(|t| t == ARR_MARKER) {
        return ClassicToken::Arr;
    }
    ClassicToken::Other
}

/// Classify a classic-dialect request from its two selector arguments.
///
/// Symmetric: swapping `left` and `right` yields the same result.
#[must_use]
pub fn classify_classic(left: &[Channel], right: &[Channel]) -> ClassicRequest {
    let (a, b) = (classify_classic_side(left), classify_classic_side(right));

    match (a, b) {
        (ClassicToken::UserData, _) | (_, ClassicToken::UserData) => ClassicRequest::UserData,
        (ClassicToken::Aggregate(tag), ClassicToken::Arr)
        | (ClassicToken::Arr, ClassicToken::Aggregate(tag)) => ClassicRequest::Aggregate { tag },
        _ => ClassicRequest::Unrecognized,
    }
}

// =============================================================================
// Chain Dialect Classification
// =============================================================================

/// Kind of a chain-dialect channel token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainChannelKind {
    /// Per-symbol market data (`trades`, `marketDepth`, `ticker`,
    /// `miniTicker`, `kline_*`).
    MarketData,
    /// Aggregate wildcard channel paired with [`GLOBAL_WILDCARD`]
    /// (`allTickers`, `allMiniTickers`, `blockheight`).
    Aggregate,
    /// Account-scoped channel subscribed against an address
    /// (`orders`, `transfers`, `accounts`).
    Account,
}

/// Classify a chain-dialect channel token, or `None` if unrecognized.
#[must_use]
pub fn chain_channel_kind(token: &str) -> Option<ChainChannelKind> {
    match token {
        "trades" | "marketDepth" | "ticker" | "miniTicker" => Some(ChainChannelKind::MarketData),
        "allTickers" | "allMiniTickers" | "blockheight" => Some(ChainChannelKind::Aggregate),
        "orders" | "transfers" | "accounts" => Some(ChainChannelKind::Account),
        kline if kline.starts_with("kline_") && kline.len() > "kline_".len() => {
            Some(ChainChannelKind::MarketData)
        }
        _ => None,
    }
}

/// Match the chain dialect's order-insensitive `$all` pairing.
///
/// Returns the aggregate channel token if one of the two tokens is the
/// global wildcard and the other an aggregate channel.
#[must_use]
pub fn classify_chain_wildcard<'a>(left: &'a str, right: &'a str) -> Option<&'a str> {
    let aggregate = |token: &'a str| {
        matches!(chain_channel_kind(token), Some(ChainChannelKind::Aggregate)).then_some(token)
    };

    if left == GLOBAL_WILDCARD {
        aggregate(right)
    } else if right == GLOBAL_WILDCARD {
        aggregate(left)
    } else {
        None
    }
}

/// Validate that every channel token is known to the chain dialect.
///
/// # Errors
///
/// Returns [`SelectorError::UnknownChannel`] naming the first offender.
pub fn validate_chain_channels(channels: &[Channel]) -> Result<(), SelectorError> {
    for channel in channels {
        if channel != GLOBAL_WILDCARD && chain_channel_kind(channel).is_none() {
            return Err(SelectorError::UnknownChannel(channel.clone()));
        }
    }
    Ok(())
}
