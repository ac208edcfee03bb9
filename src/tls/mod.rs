// TLS module - Protocol selection, chain capture and the certificate chain fetcher

pub mod capture;
pub mod fetcher;
pub mod legacy;
pub mod protocol;

pub use capture::{CapturingVerifier, ChainAccumulator, ChainRecorder, RawChain};
pub use fetcher::{CertificateChainFetcher, ChainFetcher};
pub use protocol::TlsProtocol;
