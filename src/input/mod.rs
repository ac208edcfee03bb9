// Input module - Sources that discover endpoint URLs
// Handles direct URL arguments and lists of trust lists

pub mod direct;
pub mod trust_list;

pub use direct::DirectUrlSource;
pub use trust_list::TrustListUrlSource;

use crate::endpoints::is_supported_scheme;
use crate::{HarvestError, Result};
use async_trait::async_trait;
use url::Url;

/// Something that yields endpoint URLs for the fetch pipeline
#[async_trait]
pub trait UrlSource: Send + Sync {
    async fn discover(&self) -> Result<Vec<Url>>;
}

/// Drop repeated input strings, keeping first occurrences in order
pub(crate) fn distinct_inputs(inputs: &[String]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    inputs
        .iter()
        .map(String::as_str)
        .filter(|input| seen.insert(*input))
        .collect()
}

/// Parse a user-supplied URL and require an http(s) scheme
pub(crate) fn parse_input_url(what: &'static str, input: &str) -> Result<Url> {
    let url = Url::parse(input).map_err(|source| HarvestError::InvalidUrl {
        what,
        input: input.to_string(),
        source,
    })?;

    if !is_supported_scheme(url.scheme()) {
        return Err(HarvestError::UnsupportedUrlScheme {
            scheme: url.scheme().to_string(),
        });
    }

    Ok(url)
}
