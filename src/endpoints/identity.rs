// Endpoint identity - Host-aware URL equality and the stateful distinct filter
//
// Two URLs name the same endpoint when their hosts are textually equal and the
// URLs are otherwise equal. Addresses are never resolved: virtual hosts that
// share an IP are distinct certificate sources.

use std::sync::Mutex;
use url::Url;

pub const HTTP_SCHEME: &str = "http";
pub const HTTPS_SCHEME: &str = "https";

/// Check whether two URLs identify the same endpoint
pub fn same_endpoint(a: &Url, b: &Url) -> bool {
    let hosts_match = match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => ha.eq_ignore_ascii_case(hb),
        (None, None) => true,
        _ => false,
    };

    hosts_match && a == b
}

/// Linear scan for an equivalent URL
pub fn contains_equivalent(urls: &[Url], candidate: &Url) -> bool {
    urls.iter().any(|url| same_endpoint(url, candidate))
}

pub fn is_http_url(url: &Url) -> bool {
    url.scheme().eq_ignore_ascii_case(HTTP_SCHEME)
}

pub fn is_https_url(url: &Url) -> bool {
    url.scheme().eq_ignore_ascii_case(HTTPS_SCHEME)
}

/// Only http and https URLs may enter the fetch pipeline
pub fn is_supported_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case(HTTP_SCHEME) || scheme.eq_ignore_ascii_case(HTTPS_SCHEME)
}

/// Stateful predicate admitting the first URL of each endpoint equivalence class
///
/// The seen-set is behind a mutex so one filter may be shared between threads;
/// admission of a URL is atomic with respect to other callers.
#[derive(Debug, Default)]
pub struct DistinctUrlFilter {
    seen: Mutex<Vec<Url>>,
}

impl DistinctUrlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time an endpoint is offered, false afterwards
    pub fn admit(&self, url: &Url) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if contains_equivalent(&seen, url) {
            false
        } else {
            seen.push(url.clone());
            true
        }
    }

    /// Keep only first occurrences, preserving order
    pub fn filter<I>(&self, urls: I) -> Vec<Url>
    where
        I: IntoIterator<Item = Url>,
    {
        urls.into_iter().filter(|url| self.admit(url)).collect()
    }

    /// Number of distinct endpoints admitted so far
    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
