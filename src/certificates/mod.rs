// Certificates module - Chain model, extraction policy and trust store output

pub mod extract;
pub mod parser;
pub mod trust_store;

#[cfg(test)]
mod testing;

pub use extract::ExtractionPolicy;
pub use parser::{Certificate, CertificateChain, CertificateSet};
pub use trust_store::{StoreType, TrustStoreOptions, save_certificates};
