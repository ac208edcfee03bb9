// trustharvest - Trust store generator for TLS endpoints and trust lists
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

//! trustharvest collects the certificate chains presented by TLS servers,
//! either named directly or published through lists of trust lists, applies
//! an extraction policy to each chain and writes the result as a trust store.
//! Certificates are captured, never validated.

pub mod certificates;
pub mod cli;
pub mod commands;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod tls;
pub mod trust_list;

// Re-export commonly used types
pub use crate::cli::Args;
pub use crate::config::{HarvestConfig, Settings};
pub use crate::error::{ErrorKind, ErrorPolicy, HarvestError, Result};
pub use crate::pipeline::{HarvestReport, Harvester};
