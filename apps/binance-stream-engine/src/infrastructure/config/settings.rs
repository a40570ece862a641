//! Engine Configuration Settings
//!
//! Configuration types for the stream engine, loaded from environment
//! variables.

use crate::infrastructure::binance::Exchange;

/// Binance API credentials.
///
/// Required only to resolve a session key for authenticated user-data
/// streams. The `Debug` implementation redacts both values.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the API secret.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Whether both key and secret are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Exchange dialect, fixed per engine instance.
    pub exchange: Exchange,
    /// API credentials, if user-data streams are needed.
    pub credentials: Option<Credentials>,
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// - `BINANCE_EXCHANGE`: `binance.com` | `binance.je` | `binance.org`
    ///   (default: `binance.com`)
    /// - `BINANCE_API_KEY` / `BINANCE_API_SECRET`: optional, both required
    ///   together
    ///
    /// # Errors
    ///
    /// Returns an error on an unrecognized exchange name, an empty
    /// credential value, or a key without a secret (and vice versa).
    pub fn from_env() -> Result<Self, ConfigError> {
        let exchange = match std::env::var("BINANCE_EXCHANGE") {
            Ok(name) => Exchange::from_str_case_insensitive(&name)
                .ok_or(ConfigError::UnknownExchange(name))?,
            Err(_) => Exchange::default(),
        };

        let api_key = std::env::var("BINANCE_API_KEY").ok();
        let api_secret = std::env::var("BINANCE_API_SECRET").ok();

        let credentials = match (api_key, api_secret) {
            (Some(key), Some(secret)) => {
                if key.is_empty() {
                    return Err(ConfigError::EmptyValue("BINANCE_API_KEY".to_string()));
                }
                if secret.is_empty() {
                    return Err(ConfigError::EmptyValue("BINANCE_API_SECRET".to_string()));
                }
                Some(Credentials::new(key, secret))
            }
            (Some(_), None) => {
                return Err(ConfigError::MissingEnvVar("BINANCE_API_SECRET".to_string()));
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingEnvVar("BINANCE_API_KEY".to_string()));
            }
            (None, None) => None,
        };

        Ok(Self {
            exchange,
            credentials,
        })
    }

    /// Load `.env` (if present) and read configuration from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Exchange name is not one of the supported dialects.
    #[error("unknown exchange: {0}")]
    UnknownExchange(String),
}
