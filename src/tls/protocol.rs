// TLS protocol selection - Maps operator-facing protocol names to rustls, OpenSSL and reqwest settings

use crate::{HarvestError, Result};
use openssl::ssl::SslVersion;
use rustls::SupportedProtocolVersion;
use std::fmt;
use std::str::FromStr;

static TLS12_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS12];
static TLS13_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS13];

/// TLS protocol used for every handshake in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TlsProtocol {
    /// Any version the client supports (TLS 1.2 or 1.3)
    Tls,
    /// TLS 1.2 only
    #[default]
    Tls12,
    /// TLS 1.3 only
    Tls13,
    /// TLS 1.0 only, negotiated through OpenSSL
    Tls10,
    /// TLS 1.1 only, negotiated through OpenSSL
    Tls11,
}

impl TlsProtocol {
    /// All selectable protocols
    pub fn all() -> Vec<TlsProtocol> {
        vec![
            TlsProtocol::Tls,
            TlsProtocol::Tls10,
            TlsProtocol::Tls11,
            TlsProtocol::Tls12,
            TlsProtocol::Tls13,
        ]
    }

    /// Formal protocol name as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            TlsProtocol::Tls => "TLS",
            TlsProtocol::Tls12 => "TLSv1.2",
            TlsProtocol::Tls13 => "TLSv1.3",
            TlsProtocol::Tls10 => "TLSv1",
            TlsProtocol::Tls11 => "TLSv1.1",
        }
    }

    /// Versions rustls cannot speak; handshakes go through OpenSSL instead
    pub fn is_legacy(&self) -> bool {
        matches!(self, TlsProtocol::Tls10 | TlsProtocol::Tls11)
    }

    /// Resolve an optional protocol name, falling back to the default
    pub fn from_option(name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => name.parse(),
            None => Ok(TlsProtocol::default()),
        }
    }

    /// Protocol versions handed to the rustls config builder
    ///
    /// Empty for the legacy versions.
    pub fn rustls_versions(&self) -> &'static [&'static SupportedProtocolVersion] {
        match self {
            TlsProtocol::Tls => rustls::ALL_VERSIONS,
            TlsProtocol::Tls12 => TLS12_ONLY,
            TlsProtocol::Tls13 => TLS13_ONLY,
            TlsProtocol::Tls10 | TlsProtocol::Tls11 => &[],
        }
    }

    /// Lower and upper version bounds for an OpenSSL connector
    pub fn openssl_bounds(&self) -> (SslVersion, SslVersion) {
        match self {
            TlsProtocol::Tls => (SslVersion::TLS1_2, SslVersion::TLS1_3),
            TlsProtocol::Tls10 => (SslVersion::TLS1, SslVersion::TLS1),
            TlsProtocol::Tls11 => (SslVersion::TLS1_1, SslVersion::TLS1_1),
            TlsProtocol::Tls12 => (SslVersion::TLS1_2, SslVersion::TLS1_2),
            TlsProtocol::Tls13 => (SslVersion::TLS1_3, SslVersion::TLS1_3),
        }
    }

    /// Lower and upper version bounds for the reqwest client
    ///
    /// The rustls backend of reqwest has no TLS 1.0 or 1.1, so HTTP requests
    /// made under a legacy selection use any modern version.
    pub fn reqwest_bounds(&self) -> (reqwest::tls::Version, reqwest::tls::Version) {
        use reqwest::tls::Version;

        match self {
            TlsProtocol::Tls | TlsProtocol::Tls10 | TlsProtocol::Tls11 => {
                (Version::TLS_1_2, Version::TLS_1_3)
            }
            TlsProtocol::Tls12 => (Version::TLS_1_2, Version::TLS_1_2),
            TlsProtocol::Tls13 => (Version::TLS_1_3, Version::TLS_1_3),
        }
    }
}

impl FromStr for TlsProtocol {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self> {
        TlsProtocol::all()
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| HarvestError::UnsupportedTlsProtocol {
                protocol: s.to_string(),
            })
    }
}

impl fmt::Display for TlsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
