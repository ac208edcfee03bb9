// Connection, redirect and error handling arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// Connection and traversal options
///
/// Values left unset fall back to the settings file, then to built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Follow HTTP redirects and fetch chains from every hop
    #[arg(long = "follow-redirects")]
    pub follow_redirects: bool,

    /// Log failures of single endpoints and carry on
    #[arg(long = "continue-on-error")]
    pub continue_on_error: bool,

    /// Connection timeout in seconds
    #[arg(long = "connect-timeout", value_name = "SECONDS")]
    pub connect_timeout: Option<u64>,

    /// Read and handshake timeout in seconds
    #[arg(long = "read-timeout", value_name = "SECONDS")]
    pub read_timeout: Option<u64>,

    /// Maximum redirects followed from one URL
    #[arg(long = "max-redirects", value_name = "COUNT")]
    pub max_redirects: Option<usize>,

    /// Levels of trust lists parsed, counting the given ones
    #[arg(long = "lotl-depth", value_name = "DEPTH")]
    pub lotl_depth: Option<usize>,
}
