// Redirect resolver - Follows HTTP redirects one hop at a time

use super::probe_client;
use crate::config::NetworkSettings;
use crate::endpoints::{contains_equivalent, is_supported_scheme};
use crate::error::ErrorPolicy;
use crate::output;
use crate::tls::TlsProtocol;
use crate::{HarvestError, Result};
use reqwest::header::LOCATION;
use url::Url;

/// Walks the redirect chain starting at a URL
///
/// Each hop is a GET with automatic redirects disabled. A URL joins the
/// chain only once a response was received from it, so an unreachable hop
/// never appears in the result.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    client: reqwest::Client,
    max_redirects: usize,
}

impl RedirectResolver {
    pub fn new(protocol: TlsProtocol, settings: &NetworkSettings) -> Result<Self> {
        Ok(Self {
            client: probe_client(protocol, settings)?,
            max_redirects: settings.max_redirects,
        })
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Resolve the full chain, propagating the first failure
    pub async fn resolve(&self, start: &Url) -> Result<Vec<Url>> {
        let mut chain = Vec::new();
        self.follow(start, &mut chain).await?;
        Ok(chain)
    }

    /// Resolve the chain, handing failures to `policy`
    ///
    /// When the policy swallows the failure, the hops reached before it are
    /// returned.
    pub async fn resolve_with(&self, start: &Url, policy: &ErrorPolicy) -> Result<Vec<Url>> {
        let mut chain = Vec::new();
        if let Err(err) = self.follow(start, &mut chain).await {
            policy.handle(err)?;
        }
        Ok(chain)
    }

    async fn follow(&self, start: &Url, chain: &mut Vec<Url>) -> Result<()> {
        let mut current = start.clone();

        loop {
            tracing::debug!("Probing {} for redirects", current);

            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|source| HarvestError::Connection {
                    url: current.to_string(),
                    source,
                })?;

            chain.push(current.clone());

            let status = response.status();
            if !status.is_redirection() {
                return Ok(());
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| HarvestError::MissingRedirectLocation {
                    url: current.to_string(),
                    status: status.as_u16(),
                })?;

            let next = resolve_location(&current, location)?;
            output::print_redirect(&current, status.as_u16(), &next);

            // Cycle
            if contains_equivalent(chain, &next) {
                return Ok(());
            }
            if chain.len() > self.max_redirects {
                return Err(HarvestError::TooManyRedirects {
                    url: start.to_string(),
                    limit: self.max_redirects,
                });
            }

            current = next;
        }
    }
}

/// Turn a Location header value into an absolute http(s) URL
fn resolve_location(current: &Url, location: &str) -> Result<Url> {
    let resolved = match Url::parse(location) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let url = current
                .join(location)
                .map_err(|source| HarvestError::InvalidRedirectLocation {
                    location: location.to_string(),
                    source,
                })?;
            output::print_resolved(location, &url);
            url
        }
        Err(source) => {
            return Err(HarvestError::InvalidRedirectLocation {
                location: location.to_string(),
                source,
            });
        }
    };

    if !is_supported_scheme(resolved.scheme()) {
        return Err(HarvestError::UnsupportedRedirectScheme {
            location: location.to_string(),
        });
    }

    Ok(resolved)
}
