// Trust Store Output - Serializes the harvested certificate set
//
// Copyright (C) 2025 Marc Rivero López
// Licensed under the GNU General Public License v3.0

use super::parser::{Certificate, CertificateSet};
use crate::{HarvestError, Result};
use openssl::x509::X509;
use p12_keystore::{Certificate as KeyStoreCertificate, KeyStore, KeyStoreEntry};
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported trust store formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    /// Password protected PKCS#12 keystore of trusted-certificate entries
    #[default]
    Pkcs12,
    /// Concatenated PEM blocks, each preceded by an alias comment
    Pem,
}

impl StoreType {
    pub fn name(&self) -> &'static str {
        match self {
            StoreType::Pkcs12 => "PKCS12",
            StoreType::Pem => "PEM",
        }
    }

    pub fn needs_password(&self) -> bool {
        matches!(self, StoreType::Pkcs12)
    }
}

impl FromStr for StoreType {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PKCS12" | "P12" => Ok(StoreType::Pkcs12),
            "PEM" => Ok(StoreType::Pem),
            _ => Err(HarvestError::UnsupportedStoreType {
                store_type: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where and how to write the trust store
#[derive(Clone, PartialEq, Eq)]
pub struct TrustStoreOptions {
    pub store_type: StoreType,
    pub path: PathBuf,
    /// Prompted for on the terminal when absent and the store needs one
    pub password: Option<String>,
}

impl fmt::Debug for TrustStoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustStoreOptions")
            .field("store_type", &self.store_type)
            .field("path", &self.path)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Alias every certificate by its simple name
///
/// Certificates sharing a name collapse to the last one, the same way a
/// keyed store overwrites an existing entry.
pub fn alias_certificates(certificates: &CertificateSet) -> Vec<(String, &Certificate)> {
    let mut entries: Vec<(String, &Certificate)> = Vec::with_capacity(certificates.len());

    for certificate in certificates.iter() {
        let alias = certificate.simple_name().to_string();
        match entries.iter_mut().find(|(existing, _)| *existing == alias) {
            Some(entry) => {
                tracing::warn!("Truststore alias {} already in use, overwriting entry", alias);
                entry.1 = certificate;
            }
            None => entries.push((alias, certificate)),
        }
    }

    entries
}

/// Write `certificates` to the configured trust store
pub fn save_certificates(certificates: &CertificateSet, options: &TrustStoreOptions) -> Result<()> {
    let entries = alias_certificates(certificates);

    let bytes = match options.store_type {
        StoreType::Pem => encode_pem(&entries)?,
        StoreType::Pkcs12 => {
            let password = match &options.password {
                Some(password) => password.clone(),
                None => prompt_password()?,
            };
            encode_pkcs12(&entries, &password)?
        }
    };

    std::fs::write(&options.path, bytes).map_err(|source| HarvestError::FileSystem {
        path: options.path.clone(),
        source,
    })?;

    tracing::info!(
        "Wrote {} certificates to {} ({})",
        entries.len(),
        options.path.display(),
        options.store_type
    );
    Ok(())
}

fn to_x509(certificate: &Certificate) -> Result<X509> {
    Ok(X509::from_der(certificate.der().as_ref())?)
}

fn encode_pem(entries: &[(String, &Certificate)]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (alias, certificate) in entries {
        out.extend_from_slice(format!("# {}\n", alias).as_bytes());
        out.extend_from_slice(&to_x509(certificate)?.to_pem()?);
    }
    Ok(out)
}

// One trusted-certificate entry per alias
fn encode_pkcs12(entries: &[(String, &Certificate)], password: &str) -> Result<Vec<u8>> {
    let mut keystore = KeyStore::new();
    for (alias, certificate) in entries {
        tracing::debug!("Adding {} to PKCS12 truststore", alias);
        let entry = KeyStoreCertificate::from_der(certificate.der().as_ref())
            .map_err(|e| HarvestError::TrustStore {
                reason: format!("{}: {}", alias, e),
            })?;
        keystore.add_entry(alias, KeyStoreEntry::Certificate(entry));
    }

    keystore
        .writer(password)
        .write()
        .map_err(|e| HarvestError::TrustStore {
            reason: e.to_string(),
        })
}

fn prompt_password() -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(HarvestError::NoConsole);
    }

    let password = dialoguer::Password::new()
        .with_prompt("Input truststore password")
        .allow_empty_password(true)
        .interact()?;
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificates::testing::named_certificate;

    #[test]
    fn test_store_type_parsing() {
        assert_eq!("PKCS12".parse::<StoreType>().unwrap(), StoreType::Pkcs12);
        assert_eq!("pkcs12".parse::<StoreType>().unwrap(), StoreType::Pkcs12);
        assert_eq!("pem".parse::<StoreType>().unwrap(), StoreType::Pem);

        let err = "JKS".parse::<StoreType>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported truststore type: JKS");
        assert!(err.is_input_error());
    }

    #[test]
    fn test_duplicate_aliases_overwrite() {
        let first = named_certificate(Some("Shared Name"), "First Org");
        let second = named_certificate(Some("Shared Name"), "Second Org");
        let other = named_certificate(Some("Other"), "Other Org");
        let set: CertificateSet = vec![first, other, second.clone()].into_iter().collect();

        let entries = alias_certificates(&set);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "Shared Name");
        assert_eq!(entries[0].1, &second);
        assert_eq!(entries[1].0, "Other");
    }

    #[test]
    fn test_pem_blocks_carry_aliases() {
        let set: CertificateSet = vec![named_certificate(Some("Alpha"), "Org")]
            .into_iter()
            .collect();

        let pem = String::from_utf8(encode_pem(&alias_certificates(&set)).unwrap()).unwrap();

        assert!(pem.starts_with("# Alpha\n-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn test_pkcs12_entries_are_keyed_by_alias() {
        let set: CertificateSet = vec![
            named_certificate(Some("Alpha"), "Org"),
            named_certificate(None, "Beta Org"),
        ]
        .into_iter()
        .collect();
        let entries = alias_certificates(&set);

        let der = encode_pkcs12(&entries, "changeit").unwrap();
        let keystore = KeyStore::from_pkcs12(&der, "changeit").unwrap();

        for (alias, _) in &entries {
            assert!(
                matches!(keystore.entry(alias), Some(KeyStoreEntry::Certificate(_))),
                "missing entry {}",
                alias
            );
        }
    }

    #[test]
    fn test_options_debug_hides_password() {
        let options = TrustStoreOptions {
            store_type: StoreType::Pkcs12,
            path: PathBuf::from("out.p12"),
            password: Some("secret".to_string()),
        };

        assert!(!format!("{:?}", options).contains("secret"));
    }
}
