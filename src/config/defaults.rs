use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chaincode::SettlePolicy;
use crate::cli::{ApplyArgs, PeerArgs};
use crate::error::FabricError;
use crate::http::TransportOptions;

/// Section of the configuration file holding [`ClientConfig`].
pub const CONFIG_SECTION: &str = "client";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub peer_url: String,
    pub verbose: bool,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub settle_delay_ms: u64,
    pub poll_interval_ms: Option<u64>,
    pub poll_max_attempts: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            peer_url: String::new(),
            verbose: false,
            timeout_secs: 30,
            max_retries: 3,
            settle_delay_ms: 3000,
            poll_interval_ms: None,
            poll_max_attempts: None,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), FabricError> {
        if self.peer_url.trim().is_empty() {
            return Err(FabricError::validation("peer_url is required"));
        }
        if self.timeout_secs == 0 {
            return Err(FabricError::validation("timeout_secs must be greater than zero"));
        }
        self.settle_policy().validate()
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            max_retries: self.max_retries,
            timeout: Duration::from_secs(self.timeout_secs),
            verbose: self.verbose,
        }
    }

    /// Bounded polling when both poll settings are present, otherwise a
    /// single fixed wait.
    pub fn settle_policy(&self) -> SettlePolicy {
        match (self.poll_interval_ms, self.poll_max_attempts) {
            (Some(interval_ms), Some(max_attempts)) => SettlePolicy::Poll {
                interval: Duration::from_millis(interval_ms),
                max_attempts,
            },
            _ => SettlePolicy::Fixed(Duration::from_millis(self.settle_delay_ms)),
        }
    }
}

impl ApplyArgs for ClientConfig {
    fn apply_peer(&mut self, args: &PeerArgs) {
        if let Some(peer_url) = &args.peer_url {
            self.peer_url = peer_url.clone();
        }
        if args.verbose {
            self.verbose = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_policy_selection() {
        let mut config = ClientConfig::default();
        assert_eq!(config.settle_policy(), SettlePolicy::Fixed(Duration::from_secs(3)));

        config.poll_interval_ms = Some(250);
        assert_eq!(config.settle_policy(), SettlePolicy::Fixed(Duration::from_secs(3)));

        config.poll_max_attempts = Some(8);
        assert_eq!(
            config.settle_policy(),
            SettlePolicy::Poll {
                interval: Duration::from_millis(250),
                max_attempts: 8
            }
        );
    }

    #[test]
    fn test_cli_args_override_file_values() {
        let mut config = ClientConfig {
            peer_url: "http://127.0.0.1:7050".to_string(),
            ..Default::default()
        };

        config.apply_peer(&PeerArgs {
            peer_url: Some("https://peer.example.com:5003".to_string()),
            verbose: true,
        });

        assert_eq!(config.peer_url, "https://peer.example.com:5003");
        assert!(config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_peer_url_is_rejected() {
        let err = ClientConfig::default().validate().unwrap_err();
        assert_eq!(err.message, "peer_url is required");
    }
}
