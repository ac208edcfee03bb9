// Test fixtures - Generated certificates for unit tests

use super::parser::{Certificate, CertificateChain};
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};

fn self_signed(dn: DistinguishedName) -> Certificate {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    params.distinguished_name = dn;
    let cert = params.self_signed(&key).unwrap();
    Certificate::from_der(cert.der().clone()).unwrap()
}

/// Self-signed certificate with an optional CN and an organization
pub(crate) fn named_certificate(common_name: Option<&str>, organization: &str) -> Certificate {
    let mut dn = DistinguishedName::new();
    if let Some(cn) = common_name {
        dn.push(DnType::CommonName, cn);
    }
    dn.push(DnType::OrganizationName, organization);
    self_signed(dn)
}

/// Chain of unrelated self-signed certificates named in order
pub(crate) fn test_chain(names: &[&str]) -> CertificateChain {
    CertificateChain::new(
        names
            .iter()
            .map(|name| named_certificate(Some(name), "trustharvest tests"))
            .collect(),
    )
}
