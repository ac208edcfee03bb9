// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::certificates::{ExtractionPolicy, StoreType, TrustStoreOptions};
use crate::config::{HarvestConfig, Settings};
use crate::tls::TlsProtocol;
use crate::{HarvestError, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Sub-modules for organized CLI arguments
mod connection_args;
mod input_args;
mod tls_config_args;
mod trust_store_args;

// Re-export sub-structs
pub use connection_args::ConnectionArgs;
pub use input_args::InputArgs;
pub use tls_config_args::TlsConfigArgs;
pub use trust_store_args::TrustStoreArgs;

/// trustharvest - Build trust stores from the certificates servers present
///
/// The Args struct is organized into logical domains:
/// - Endpoint discovery (InputArgs)
/// - Trust store output (TrustStoreArgs)
/// - TLS protocol and chain extraction (TlsConfigArgs)
/// - Connection, redirect and error handling (ConnectionArgs)
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, long_about = None)]
#[command(name = "trustharvest")]
#[command(about = "Generate a trust store from TLS certificate chains", long_about = None)]
pub struct Args {
    // ============ Endpoint Discovery ============
    #[command(flatten)]
    pub input: InputArgs,

    // ============ Trust Store Output ============
    #[command(flatten)]
    pub trust_store: TrustStoreArgs,

    // ============ TLS Configuration ============
    #[command(flatten)]
    pub tls: TlsConfigArgs,

    // ============ Connection Settings ============
    #[command(flatten)]
    pub connection: ConnectionArgs,

    // ============ Configuration File ============
    /// Settings file (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write an example settings file and exit
    #[arg(long = "config-example", value_name = "FILE")]
    pub config_example: Option<PathBuf>,
}

impl Args {
    /// Settings from `--config`, or the defaults
    pub fn settings(&self) -> Result<Settings> {
        match &self.config {
            Some(path) => Settings::from_file(path),
            None => Ok(Settings::default()),
        }
    }

    /// Validate every argument and merge it with the settings file
    ///
    /// All input errors surface here, before any network activity.
    pub fn to_config(&self) -> Result<HarvestConfig> {
        let settings = self.settings()?;

        if self.input.is_empty() {
            return Err(HarvestError::MissingArgumentGroup { group: "input" });
        }
        let path = self
            .trust_store
            .out
            .clone()
            .ok_or(HarvestError::MissingArgumentGroup { group: "output" })?;
        validate_output_path(&path)?;

        let protocol = TlsProtocol::from_option(Some(
            self.tls
                .tls_protocol
                .as_deref()
                .unwrap_or(&settings.tls_protocol),
        ))?;
        let extraction = ExtractionPolicy::from_options(&self.tls.extract_from_chain)?;
        let store_type: StoreType = self
            .trust_store
            .store_type
            .as_deref()
            .unwrap_or(&settings.store_type)
            .parse()?;

        let mut network = settings.network();
        if let Some(secs) = self.connection.connect_timeout {
            network.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.connection.read_timeout {
            network.read_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = self.connection.max_redirects {
            network.max_redirects = max;
        }

        Ok(HarvestConfig {
            urls: self.input.urls.clone(),
            trust_lists: self.input.lotl_urls.clone(),
            protocol,
            follow_redirects: self.connection.follow_redirects,
            continue_on_error: self.connection.continue_on_error,
            extraction,
            trust_list_depth: self
                .connection
                .lotl_depth
                .unwrap_or(settings.trust_list_depth),
            network,
            store: TrustStoreOptions {
                store_type,
                path,
                password: self.trust_store.password.clone(),
            },
        })
    }
}

fn validate_output_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(HarvestError::InvalidOutputPath {
            reason: "empty path".to_string(),
        });
    }
    if path.is_dir() {
        return Err(HarvestError::InvalidOutputPath {
            reason: format!("{} is a directory", path.display()),
        });
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(HarvestError::InvalidOutputPath {
                reason: format!("directory {} does not exist", parent.display()),
            })
        }
        _ => Ok(()),
    }
}
