// Endpoints module - URL identity, scheme checks and deduplication

pub mod identity;

pub use identity::{
    DistinctUrlFilter, contains_equivalent, is_http_url, is_https_url, is_supported_scheme,
    same_endpoint,
};
