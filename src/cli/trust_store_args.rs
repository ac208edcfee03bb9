// Trust store output arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

/// Trust store output options
#[derive(Args, Debug, Clone, Default)]
pub struct TrustStoreArgs {
    /// Output trust store path
    #[arg(short = 'o', long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Trust store type (PKCS12, PEM) [default: PKCS12]
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub store_type: Option<String>,

    /// Trust store password (prompted for when omitted)
    #[arg(short = 'p', long = "password", value_name = "PASSWORD")]
    pub password: Option<String>,
}
