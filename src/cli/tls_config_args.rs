// TLS and chain extraction arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// TLS handshake and chain extraction options
///
/// The protocol applies to chain capture, redirect probing and trust-list
/// downloads alike.
#[derive(Args, Debug, Clone, Default)]
pub struct TlsConfigArgs {
    /// TLS protocol: TLS, TLSv1, TLSv1.1, TLSv1.2, TLSv1.3 [default: TLSv1.2]
    #[arg(long = "tls-protocol", visible_alias = "tls", value_name = "PROTOCOL")]
    pub tls_protocol: Option<String>,

    /// Certificates to keep from each chain: all, first, last, ca-or-cert,
    /// interactive, or zero-based indices
    #[arg(long = "extract-from-chain", value_name = "OPTION", num_args = 1..)]
    pub extract_from_chain: Vec<String>,
}
