// Error types for trustharvest
//
// Every failure the pipeline can raise is a variant of `HarvestError`. Each
// variant belongs to exactly one `ErrorKind`, which decides how the binary
// reports it and whether the continue-on-error policy may skip it.

use colored::*;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing user-supplied data; always fatal, reported with usage help
    Input,
    /// Well-formed input that failed to decode into the expected structure
    Parse,
    /// Operational or environment failure (network, TLS, console, file system)
    Technical,
}

/// Main error type for trustharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    // ============ Input errors ============
    /// URL string could not be parsed
    #[error("Failed to parse {what}: {}", describe_input(.input))]
    InvalidUrl {
        what: &'static str,
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// URL parsed but its scheme is neither http nor https
    #[error("Invalid input URL protocol: {scheme}")]
    UnsupportedUrlScheme { scheme: String },

    /// TLS protocol name is unknown or not available in this build
    #[error("Unsupported TLS protocol: {protocol}")]
    UnsupportedTlsProtocol { protocol: String },

    /// Extraction token is neither a named option nor an index
    #[error("Unrecognized certificate chain extraction option: {option}")]
    UnrecognizedExtractionOption { option: String },

    /// Named extraction options combined with each other or with indices
    #[error("Illegal combination of certificate chain extraction options: {options:?}")]
    IllegalExtractionCombination { options: Vec<String> },

    /// Trust store type is not supported
    #[error("Unsupported truststore type: {store_type}")]
    UnsupportedStoreType { store_type: String },

    /// A required argument group is absent
    #[error("No {group} argument provided")]
    MissingArgumentGroup { group: &'static str },

    /// Output path is unusable
    #[error("Invalid output parameter: {reason}")]
    InvalidOutputPath { reason: String },

    /// Settings file could not be read or decoded
    #[error("Invalid configuration file {}: {reason}", .path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    // ============ Parse errors ============
    /// Trust-list body is not a well-formed XML document
    #[error("Failed to parse LOTL: {url}: {reason}")]
    TrustListDocument { url: String, reason: String },

    /// Trust-list root element has an unexpected name
    #[error("Failed to parse LOTL: {url}: No recognized root element found (got {root})")]
    UnrecognizedTrustListRoot { url: String, root: String },

    /// Pointer entry without a location element
    #[error("Failed to parse LOTL: {url}: pointer #{index} has no TSLLocation element")]
    MissingTslLocation { url: String, index: usize },

    /// Pointer location is not a valid URL
    #[error("Invalid TSL location: {location}")]
    InvalidTslLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    /// Location header cannot be turned into a URL
    #[error("Invalid Location header value: {location}")]
    InvalidRedirectLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    /// Operator typed something that is not a certificate index
    #[error("Failed to parse certificate index: {input}")]
    InvalidCertificateIndex { input: String },

    /// Peer presented bytes that do not decode as an X.509 certificate
    #[error("Failed to parse certificate: {reason}")]
    CertificateParse { reason: String },

    // ============ Technical errors ============
    /// HTTP client construction failed
    #[error("Failed to initialize HTTP client: {source}")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },

    /// rustls refused the client configuration
    #[error("Failed to initialize TLS configuration: {source}")]
    TlsConfig {
        #[source]
        source: rustls::Error,
    },

    /// HTTP request could not be completed
    #[error("Failed to open connection to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 3xx response without a usable Location header
    #[error("No Location header provided for {status} response from {url}")]
    MissingRedirectLocation { url: String, status: u16 },

    /// Redirect target uses a scheme other than http/https
    #[error("Failed to resolve redirect URL from {location}")]
    UnsupportedRedirectScheme { location: String },

    /// Redirect chain exceeded the configured hop limit
    #[error("Too many redirects starting from {url} (limit {limit})")]
    TooManyRedirects { url: String, limit: usize },

    /// Trust-list download failed after the connection was established
    #[error("Failed to load LOTL: {url}: {reason}")]
    TrustListLoad { url: String, reason: String },

    /// TCP connect or TLS handshake failed
    #[error("Failed to load TLS certificate chain from {url}: {reason}")]
    Handshake { url: String, reason: String },

    /// Handshake finished without the verifier seeing a server chain
    #[error("Failed to fetch certificate chains from {url}")]
    NoChainCaptured { url: String },

    /// Verifier saw more than one server chain in a single handshake
    #[error("Unexpected amount of certificate chains ({count}) fetched from {url}")]
    MultipleChainsCaptured { url: String, count: usize },

    /// Explicit index does not exist in the chain
    #[error("Failed to extract certificate ({index}) from chain {chain:?}: Index out of bounds")]
    IndexOutOfBounds { index: usize, chain: Vec<String> },

    /// Interactive input requested without a terminal
    #[error("No console available on this platform")]
    NoConsole,

    /// Terminal prompt failed
    #[error("Failed to read console input: {reason}")]
    Console { reason: String },

    /// Trust store could not be assembled or serialized
    #[error("Failed to create truststore: {reason}")]
    TrustStore { reason: String },

    /// File system errors
    #[error("File system error: {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn describe_input(input: &str) -> String {
    if input.trim().is_empty() {
        "Empty input".to_string()
    } else {
        format!("Invalid input: {}", input)
    }
}

impl HarvestError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarvestError::InvalidUrl { .. }
            | HarvestError::UnsupportedUrlScheme { .. }
            | HarvestError::UnsupportedTlsProtocol { .. }
            | HarvestError::UnrecognizedExtractionOption { .. }
            | HarvestError::IllegalExtractionCombination { .. }
            | HarvestError::UnsupportedStoreType { .. }
            | HarvestError::MissingArgumentGroup { .. }
            | HarvestError::InvalidOutputPath { .. }
            | HarvestError::InvalidConfig { .. } => ErrorKind::Input,

            HarvestError::TrustListDocument { .. }
            | HarvestError::UnrecognizedTrustListRoot { .. }
            | HarvestError::MissingTslLocation { .. }
            | HarvestError::InvalidTslLocation { .. }
            | HarvestError::InvalidRedirectLocation { .. }
            | HarvestError::InvalidCertificateIndex { .. }
            | HarvestError::CertificateParse { .. } => ErrorKind::Parse,

            HarvestError::HttpClient { .. }
            | HarvestError::TlsConfig { .. }
            | HarvestError::Connection { .. }
            | HarvestError::MissingRedirectLocation { .. }
            | HarvestError::UnsupportedRedirectScheme { .. }
            | HarvestError::TooManyRedirects { .. }
            | HarvestError::TrustListLoad { .. }
            | HarvestError::Handshake { .. }
            | HarvestError::NoChainCaptured { .. }
            | HarvestError::MultipleChainsCaptured { .. }
            | HarvestError::IndexOutOfBounds { .. }
            | HarvestError::NoConsole
            | HarvestError::Console { .. }
            | HarvestError::TrustStore { .. }
            | HarvestError::FileSystem { .. } => ErrorKind::Technical,
        }
    }

    /// True for errors that should be followed by usage help
    pub fn is_input_error(&self) -> bool {
        self.kind() == ErrorKind::Input
    }
}

impl From<openssl::error::ErrorStack> for HarvestError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        HarvestError::TrustStore {
            reason: err.to_string(),
        }
    }
}

impl From<dialoguer::Error> for HarvestError {
    fn from(err: dialoguer::Error) -> Self {
        HarvestError::Console {
            reason: err.to_string(),
        }
    }
}

/// Decides whether a per-endpoint failure aborts the run or is skipped
///
/// Only chain fetch and redirect failures are routed through here.
/// Startup validation, trust-list parsing and extraction always propagate.
#[derive(Debug, Default)]
pub struct ErrorPolicy {
    continue_on_error: bool,
    skipped: AtomicUsize,
}

impl ErrorPolicy {
    /// Rethrow every failure
    pub fn abort() -> Self {
        Self::default()
    }

    /// Log every failure to stderr and keep going
    pub fn continue_on_error() -> Self {
        Self {
            continue_on_error: true,
            skipped: AtomicUsize::new(0),
        }
    }

    pub fn new(continue_on_error: bool) -> Self {
        if continue_on_error {
            Self::continue_on_error()
        } else {
            Self::abort()
        }
    }

    pub fn continues(&self) -> bool {
        self.continue_on_error
    }

    /// Either swallow `err` (returning `Ok`) or hand it back to the caller
    pub fn handle(&self, err: HarvestError) -> Result<()> {
        if !self.continue_on_error {
            return Err(err);
        }

        self.skipped.fetch_add(1, Ordering::SeqCst);
        tracing::warn!("Skipping after error: {}", err);
        eprintln!("{} {}", "Error:".red().bold(), err);
        Ok(())
    }

    /// Number of failures swallowed so far
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }
}
