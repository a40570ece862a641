//! Binance Exchange Adapters
//!
//! Wire-level knowledge for the three Binance streaming dialects:
//!
//! | Exchange      | Dialect | Endpoint                              |
//! |---------------|---------|---------------------------------------|
//! | `binance.com` | classic | `wss://stream.binance.com:9443/ws/…`  |
//! | `binance.je`  | classic | `wss://stream.binance.je:9443/ws/…`   |
//! | `binance.org` | chain   | `wss://dex.binance.org/api/ws…`       |
//!
//! The two classic hosts share identical addressing rules; the chain (DEX)
//! dialect subscribes either through the URI path or, for multi-unit
//! subscriptions, through post-connect control payloads.

/// Stream manager facade wiring registry, synthesizer, and session keys.
pub mod manager;

/// Subscribe/unsubscribe control-message payloads (chain dialect).
pub mod payload;

/// Connection URI synthesis.
pub mod uri;

// =============================================================================
// Exchange Dialects
// =============================================================================

/// The fixed set of Binance streaming dialects.
///
/// Fixed per engine instance; never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Exchange {
    /// Binance (classic combined-stream dialect).
    #[default]
    BinanceCom,
    /// Binance Jersey (classic combined-stream dialect).
    BinanceJe,
    /// Binance Chain DEX (push-subscription dialect).
    BinanceOrg,
}

impl Exchange {
    /// Parse an exchange name, e.g. from configuration.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "binance.com" => Some(Self::BinanceCom),
            "binance.je" => Some(Self::BinanceJe),
            "binance.org" => Some(Self::BinanceOrg),
            _ => None,
        }
    }

    /// Canonical exchange name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BinanceCom => "binance.com",
            Self::BinanceJe => "binance.je",
            Self::BinanceOrg => "binance.org",
        }
    }

    /// Whether this is the chain (DEX) dialect.
    #[must_use]
    pub const fn is_chain(&self) -> bool {
        matches!(self, Self::BinanceOrg)
    }

    /// Base URI streams hang off.
    ///
    /// Classic hosts carry a trailing slash (stream names are appended
    /// directly); the chain endpoint does not, since the bare endpoint is
    /// itself a valid connection address.
    #[must_use]
    pub const fn websocket_base_uri(&self) -> &'static str {
        match self {
            Self::BinanceCom => "wss://stream.binance.com:9443/ws/",
            Self::BinanceJe => "wss://stream.binance.je:9443/ws/",
            Self::BinanceOrg => "wss://dex.binance.org/api/ws",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_parsing() {
        assert_eq!(
            Exchange::from_str_case_insensitive("binance.com"),
            Some(Exchange::BinanceCom)
        );
        assert_eq!(
            Exchange::from_str_case_insensitive("BINANCE.JE"),
            Some(Exchange::BinanceJe)
        );
        assert_eq!(
            Exchange::from_str_case_insensitive("Binance.org"),
            Some(Exchange::BinanceOrg)
        );
        assert_eq!(Exchange::from_str_case_insensitive("binance.us"), None);
    }

    #[test]
    fn exchange_dialect_split() {
        assert!(!Exchange::BinanceCom.is_chain());
        assert!(!Exchange::BinanceJe.is_chain());
        assert!(Exchange::BinanceOrg.is_chain());
    }

    #[test]
    fn base_uris() {
        assert_eq!(
            Exchange::BinanceCom.websocket_base_uri(),
            "wss://stream.binance.com:9443/ws/"
        );
        assert_eq!(
            Exchange::BinanceJe.websocket_base_uri(),
            "wss://stream.binance.je:9443/ws/"
        );
        assert_eq!(
            Exchange::BinanceOrg.websocket_base_uri(),
            "wss://dex.binance.org/api/ws"
        );
    }
}
