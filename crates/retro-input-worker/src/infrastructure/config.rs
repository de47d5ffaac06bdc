//! TOML-based configuration for the worker.
//!
//! The config file path comes from the command line (see `main.rs`).  A
//! missing file is not an error: the worker starts with the defaults below.
//!
//! ```toml
//! [worker]
//! log_level = "info"
//! poll_interval_ms = 16
//! active_ports = 2
//!
//! [network]
//! bind_address = "0.0.0.0"
//! input_port = 24900
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]`, so a file may name only
//! the settings it wants to change.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use retro_input_core::MAX_PORT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `network.bind_address` is not an IP address.
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WorkerConfig {
    #[serde(default)]
    pub worker: WorkerSection,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Frame clock and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkerSection {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Interval between poll passes, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Number of player ports the frame clock polls.
    #[serde(default = "default_active_ports")]
    pub active_ports: usize,
}

/// Intake listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address to bind the intake listener to.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// TCP port input sources connect to.
    #[serde(default = "default_input_port")]
    pub input_port: u16,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_poll_interval_ms() -> u64 {
    16
}
fn default_active_ports() -> usize {
    1
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_input_port() -> u16 {
    24900
}

impl Default for WorkerSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            poll_interval_ms: default_poll_interval_ms(),
            active_ports: default_active_ports(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            input_port: default_input_port(),
        }
    }
}

impl WorkerConfig {
    /// Frame clock period.  Zero is raised to one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.worker.poll_interval_ms.max(1))
    }

    /// Number of ports to poll, clamped to `1..=MAX_PORT`.
    pub fn active_ports(&self) -> usize {
        self.worker.active_ports.clamp(1, MAX_PORT)
    }

    /// The intake listener address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` does not
    /// parse as an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .network
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.network.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.network.input_port))
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Loads `WorkerConfig` from `path`, returning `WorkerConfig::default()` if
/// no path is given or the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<WorkerConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(WorkerConfig::default());
    };

    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: WorkerConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(WorkerConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `config` to `path` as pretty TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &WorkerConfig) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("retro-input-{}.toml", uuid::Uuid::new_v4()))
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_worker_config_default_values() {
        // Arrange / Act
        let cfg = WorkerConfig::default();

        // Assert
        assert_eq!(cfg.worker.log_level, "info");
        assert_eq!(cfg.worker.poll_interval_ms, 16);
        assert_eq!(cfg.worker.active_ports, 1);
        assert_eq!(cfg.network.bind_address, "0.0.0.0");
        assert_eq!(cfg.network.input_port, 24900);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: WorkerConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, WorkerConfig::default());
    }

    #[test]
    fn test_deserialize_partial_section_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[worker]
active_ports = 3
"#;

        // Act
        let cfg: WorkerConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.worker.active_ports, 3);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.worker.poll_interval_ms, 16);
        assert_eq!(cfg.network.input_port, 24900);
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<WorkerConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    // ── Derived values ────────────────────────────────────────────────────────

    #[test]
    fn test_active_ports_is_clamped_to_max_port() {
        let mut cfg = WorkerConfig::default();

        cfg.worker.active_ports = 99;
        assert_eq!(cfg.active_ports(), MAX_PORT);

        cfg.worker.active_ports = 0;
        assert_eq!(cfg.active_ports(), 1);
    }

    #[test]
    fn test_poll_interval_never_zero() {
        let mut cfg = WorkerConfig::default();
        cfg.worker.poll_interval_ms = 0;
        assert_eq!(cfg.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_socket_addr_combines_address_and_port() {
        let mut cfg = WorkerConfig::default();
        cfg.network.bind_address = "127.0.0.1".to_string();
        cfg.network.input_port = 5000;

        let addr = cfg.socket_addr().expect("valid address");

        assert_eq!(addr, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_socket_addr_rejects_hostname() {
        let mut cfg = WorkerConfig::default();
        cfg.network.bind_address = "localhost".to_string();

        let result = cfg.socket_addr();

        assert!(matches!(result, Err(ConfigError::InvalidBindAddress(a)) if a == "localhost"));
    }

    // ── Loading ─────────────────────────────────────────────────────────────

    #[test]
    fn test_load_config_missing_file_returns_defaults() {
        let path = temp_path();

        let cfg = load_config(Some(&path)).expect("missing file is not an error");

        assert_eq!(cfg, WorkerConfig::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        // Arrange
        let path = temp_path();
        let mut cfg = WorkerConfig::default();
        cfg.worker.log_level = "debug".to_string();
        cfg.network.input_port = 31000;

        // Act
        save_config(&path, &cfg).expect("save");
        let restored = load_config(Some(&path)).expect("load");
        let _ = std::fs::remove_file(&path);

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_load_config_malformed_file_returns_parse_error() {
        let path = temp_path();
        std::fs::write(&path, "worker = 5 = 6").expect("write");

        let result = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
