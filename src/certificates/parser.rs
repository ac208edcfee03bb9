// Certificate Parser - Certificates, chains and the deduplicated certificate set

use crate::{HarvestError, Result};
use rustls_pki_types::CertificateDer;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use x509_parser::prelude::*;

/// X.509 certificate as received from a peer
///
/// Identity is the DER encoding; the subject fields are decoded once at
/// construction for display and alias derivation.
#[derive(Clone)]
pub struct Certificate {
    der: CertificateDer<'static>,
    subject: String,
    common_name: Option<String>,
}

impl Certificate {
    /// Parse a DER-encoded certificate
    pub fn from_der(der: impl Into<CertificateDer<'static>>) -> Result<Self> {
        let der = der.into();

        let (subject, common_name) = {
            let (_, cert) = X509Certificate::from_der(der.as_ref()).map_err(|e| {
                HarvestError::CertificateParse {
                    reason: e.to_string(),
                }
            })?;

            let subject = cert.subject().to_string();
            let common_name = cert
                .subject()
                .iter_common_name()
                .next()
                .and_then(|cn| cn.as_str().ok())
                .map(|cn| cn.to_string());

            (subject, common_name)
        };

        Ok(Self {
            der,
            subject,
            common_name,
        })
    }

    pub fn der(&self) -> &CertificateDer<'static> {
        &self.der
    }

    /// Subject distinguished name
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    /// Subject CN, or the full subject DN when no CN is present
    pub fn simple_name(&self) -> &str {
        self.common_name.as_deref().unwrap_or(&self.subject)
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.der.as_ref() == other.der.as_ref()
    }
}

impl Eq for Certificate {}

impl Hash for Certificate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.der.as_ref().hash(state);
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("der_len", &self.der.len())
            .finish()
    }
}

/// Certificate chain as presented in one handshake, leaf first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CertificateChain {
    certificates: Vec<Certificate>,
}

impl CertificateChain {
    pub fn new(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }

    /// Decode every certificate of a raw chain
    pub fn from_der_chain(chain: Vec<CertificateDer<'static>>) -> Result<Self> {
        let certificates = chain
            .into_iter()
            .map(Certificate::from_der)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { certificates })
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Certificate> {
        self.certificates.get(index)
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certificates.iter()
    }

    /// Get the leaf (server) certificate
    pub fn leaf(&self) -> Option<&Certificate> {
        self.certificates.first()
    }

    /// Simple names of all certificates, in chain order
    pub fn simple_names(&self) -> Vec<String> {
        self.certificates
            .iter()
            .map(|c| c.simple_name().to_string())
            .collect()
    }

    /// Sub-chain made of the given positions; callers validate the indices
    pub(crate) fn select(&self, indices: &[usize]) -> CertificateChain {
        CertificateChain::new(
            indices
                .iter()
                .filter_map(|&i| self.certificates.get(i).cloned())
                .collect(),
        )
    }

    pub fn into_certificates(self) -> Vec<Certificate> {
        self.certificates
    }
}

impl fmt::Display for CertificateChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.simple_names().join(", "))
    }
}

impl<'a> IntoIterator for &'a CertificateChain {
    type Item = &'a Certificate;
    type IntoIter = std::slice::Iter<'a, Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certificates.iter()
    }
}

/// Deduplicated certificate collection, iterated in first-seen order
#[derive(Debug, Default, Clone)]
pub struct CertificateSet {
    certificates: Vec<Certificate>,
    seen: HashSet<Certificate>,
}

impl CertificateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a certificate; returns false when it was already present
    pub fn insert(&mut self, certificate: Certificate) -> bool {
        if self.seen.contains(&certificate) {
            return false;
        }
        self.seen.insert(certificate.clone());
        self.certificates.push(certificate);
        true
    }

    pub fn contains(&self, certificate: &Certificate) -> bool {
        self.seen.contains(certificate)
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certificates.iter()
    }
}

impl Extend<Certificate> for CertificateSet {
    fn extend<I: IntoIterator<Item = Certificate>>(&mut self, iter: I) {
        for certificate in iter {
            self.insert(certificate);
        }
    }
}

impl FromIterator<Certificate> for CertificateSet {
    fn from_iter<I: IntoIterator<Item = Certificate>>(iter: I) -> Self {
        let mut set = CertificateSet::new();
        set.extend(iter);
        set
    }
}
