//! Runtime configuration
//!
//! Resolved from the environment on top of network defaults. The binary
//! applies its command-line flags afterwards.

use std::path::PathBuf;

use crate::transaction::provider::HorizonConfig;

pub const ENV_HORIZON_URL: &str = "STELLAR_HORIZON_URL";
pub const ENV_NETWORK_PASSPHRASE: &str = "STELLAR_NETWORK_PASSPHRASE";
pub const ENV_HORIZON_TIMEOUT: &str = "STELLAR_HORIZON_TIMEOUT";
pub const ENV_HISTORY_FILE: &str = "STELLAR_WALLET_HISTORY";

pub const DEFAULT_HISTORY_FILE: &str = ".stellar-wallet-history.json";

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub horizon: HorizonConfig,
    /// Search history file
    pub history_path: PathBuf,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            horizon: HorizonConfig::default(),
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
        }
    }
}

impl WalletConfig {
    /// Read the process environment
    pub fn from_env(testnet: bool) -> Self {
        Self::from_lookup(testnet, |key| std::env::var(key).ok())
    }

    /// Resolve with an arbitrary variable lookup
    pub fn from_lookup(testnet: bool, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut horizon = if testnet {
            HorizonConfig::testnet()
        } else {
            HorizonConfig::default()
        };

        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(ENV_HORIZON_URL) {
            horizon.url = url;
        }
        if let Some(passphrase) = non_empty(ENV_NETWORK_PASSPHRASE) {
            horizon.network_passphrase = passphrase;
        }
        if let Some(timeout) = non_empty(ENV_HORIZON_TIMEOUT).and_then(|t| t.trim().parse().ok()) {
            horizon.timeout_secs = timeout;
        }

        let history_path = non_empty(ENV_HISTORY_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE));

        Self {
            horizon,
            history_path,
        }
    }

    pub fn with_horizon_url(mut self, url: impl Into<String>) -> Self {
        self.horizon.url = url.into();
        self
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::transaction::network::TESTNET_NETWORK_PASSPHRASE;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = WalletConfig::from_lookup(false, lookup(&[]));
        assert_eq!(config, WalletConfig::default());
    }

    #[test]
    fn test_testnet_defaults() {
        let config = WalletConfig::from_lookup(true, lookup(&[]));
        assert_eq!(config.horizon.network_passphrase, TESTNET_NETWORK_PASSPHRASE);
    }

    #[test]
    fn test_environment_overrides() {
        let config = WalletConfig::from_lookup(
            true,
            lookup(&[
                (ENV_HORIZON_URL, "http://localhost:8000"),
                (ENV_NETWORK_PASSPHRASE, "Standalone Network ; February 2017"),
                (ENV_HORIZON_TIMEOUT, "5"),
                (ENV_HISTORY_FILE, "/tmp/h.json"),
            ]),
        );

        assert_eq!(config.horizon.url, "http://localhost:8000");
        assert_eq!(config.horizon.network_passphrase, "Standalone Network ; February 2017");
        assert_eq!(config.horizon.timeout_secs, 5);
        assert_eq!(config.history_path, PathBuf::from("/tmp/h.json"));
    }

    #[test]
    fn test_blank_and_invalid_values_are_ignored() {
        let config = WalletConfig::from_lookup(
            false,
            lookup(&[(ENV_HORIZON_URL, "  "), (ENV_HORIZON_TIMEOUT, "soon")]),
        );
        assert_eq!(config.horizon, HorizonConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = WalletConfig::default()
            .with_horizon_url("http://example.org")
            .with_history_path("x.json");
        assert_eq!(config.horizon.url, "http://example.org");
        assert_eq!(config.history_path, PathBuf::from("x.json"));
    }
}
