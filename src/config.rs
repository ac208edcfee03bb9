// Configuration - Settings file and the validated per-run configuration

use crate::certificates::extract::ExtractionPolicy;
use crate::certificates::trust_store::TrustStoreOptions;
use crate::tls::TlsProtocol;
use crate::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Defaults that may be loaded from a TOML file and overridden on the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// TLS protocol name (TLS, TLSv1, TLSv1.1, TLSv1.2, TLSv1.3)
    pub tls_protocol: String,

    /// Trust store type (PKCS12, PEM)
    pub store_type: String,

    /// TCP connect timeout in seconds
    pub connect_timeout_seconds: u64,

    /// Read / handshake timeout in seconds
    pub read_timeout_seconds: u64,

    /// Maximum redirects followed from one starting URL
    pub max_redirects: usize,

    /// Levels of trust-list pointers parsed as trust lists themselves
    pub trust_list_depth: usize,

    /// User-Agent sent with redirect probes and trust-list downloads
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tls_protocol: TlsProtocol::default().name().to_string(),
            store_type: "PKCS12".to_string(),
            connect_timeout_seconds: 10,
            read_timeout_seconds: 10,
            max_redirects: 20,
            trust_list_depth: 1,
            user_agent: format!("trustharvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| HarvestError::InvalidConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let settings: Settings =
            toml::from_str(&content).map_err(|e| HarvestError::InvalidConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(settings)
    }

    /// Create example settings file
    pub fn create_example(path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(&Self::default()).map_err(|e| {
            HarvestError::InvalidConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        std::fs::write(path, toml).map_err(|source| HarvestError::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    pub fn network(&self) -> NetworkSettings {
        NetworkSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
            read_timeout: Duration::from_secs(self.read_timeout_seconds),
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Network knobs shared by the HTTP and TLS components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Settings::default().network()
    }
}

/// Fully validated configuration of one harvest run
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Direct endpoint URL strings
    pub urls: Vec<String>,
    /// Trust-list URL strings
    pub trust_lists: Vec<String>,
    pub protocol: TlsProtocol,
    pub follow_redirects: bool,
    pub continue_on_error: bool,
    pub extraction: ExtractionPolicy,
    pub trust_list_depth: usize,
    pub network: NetworkSettings,
    pub store: TrustStoreOptions,
}
