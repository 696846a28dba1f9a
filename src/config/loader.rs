use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment};
use log::{debug, info};

use crate::cli::{ApplyArgs, PeerArgs};

use super::defaults::{CONFIG_SECTION, ClientConfig};

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

pub fn load_configuration(path: &Path) -> Result<Config> {
    if !path.exists() {
        let sources = get_default_config();
        write_config_to(path, sources).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(Environment::with_prefix("FABRIC").prefix_separator("_").separator("__"))
        .build()
        .context("Could not build config")
}

/// Loads the `[client]` section and applies command line overrides on top.
pub fn load_client_config(path: &Path, args: &PeerArgs) -> Result<ClientConfig> {
    let cfg = load_configuration(path)?;

    let mut client_config = match cfg.get::<ClientConfig>(CONFIG_SECTION) {
        Ok(client_config) => client_config,
        Err(config::ConfigError::NotFound(_)) => ClientConfig::default(),
        Err(e) => return Err(e).context("Could not read client configuration"),
    };
    client_config.apply_peer(args);
    client_config.validate()?;

    debug!(
        peer_url = &*client_config.peer_url,
        verbose = client_config.verbose;
        "Client configuration loaded"
    );
    Ok(client_config)
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chaincode::SettlePolicy;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_from_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = load_client_config(&path, &PeerArgs::default()).unwrap();

        assert!(path.exists());
        assert_eq!(config.peer_url, "http://127.0.0.1:7050");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.settle_policy(), SettlePolicy::Fixed(Duration::from_millis(3000)));
    }

    #[test]
    fn test_file_values_and_poll_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        write_config_to(
            &path,
            r#"
[client]
peer_url = "https://peer.example.com:5003"
timeout_secs = 10
poll_interval_ms = 500
poll_max_attempts = 6
"#,
        )
        .unwrap();

        let config = load_client_config(&path, &PeerArgs::default()).unwrap();

        assert_eq!(config.peer_url, "https://peer.example.com:5003");
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.verbose);
        assert_eq!(
            config.settle_policy(),
            SettlePolicy::Poll {
                interval: Duration::from_millis(500),
                max_attempts: 6
            }
        );
    }

    #[test]
    fn test_file_without_peer_url_needs_cli_override() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        write_config_to(&path, "[client]\nverbose = true\n").unwrap();

        assert!(load_client_config(&path, &PeerArgs::default()).is_err());

        let args = PeerArgs {
            peer_url: Some("http://10.0.0.5:7050".to_string()),
            verbose: false,
        };
        let config = load_client_config(&path, &args).unwrap();
        assert_eq!(config.peer_url, "http://10.0.0.5:7050");
        assert!(config.verbose);
    }
}
