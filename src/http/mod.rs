// HTTP module - Non-validating HTTP client and redirect resolution

pub mod redirect;

pub use redirect::RedirectResolver;

use crate::config::NetworkSettings;
use crate::tls::TlsProtocol;
use crate::{HarvestError, Result};

/// Build the client used for redirect probes and trust-list downloads
///
/// Redirects are never followed automatically and server certificates are
/// accepted without validation; the TLS version is pinned to `protocol`.
pub fn probe_client(protocol: TlsProtocol, settings: &NetworkSettings) -> Result<reqwest::Client> {
    let (min_version, max_version) = protocol.reqwest_bounds();

    reqwest::Client::builder()
        .use_rustls_tls()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.read_timeout)
        .danger_accept_invalid_certs(true)
        .min_tls_version(min_version)
        .max_tls_version(max_version)
        .user_agent(settings.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|source| HarvestError::HttpClient { source })
}
