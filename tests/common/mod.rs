// Shared fixtures for the integration suites
//
// Copyright (C) 2025 Marc Rivero López
// Licensed under the GNU General Public License v3.0

#![allow(dead_code)]

use openssl::pkey::PKey;
use openssl::ssl::{SslAcceptor, SslMethod, SslVersion};
use openssl::x509::X509;
use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};
use rustls::ServerConfig;
use rustls_pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use trustharvest::certificates::{Certificate, CertificateChain};

/// A CA and a leaf it issued, both as DER, plus the leaf's private key
pub struct TestPki {
    pub leaf: CertificateDer<'static>,
    pub ca: CertificateDer<'static>,
    pub leaf_key: PrivateKeyDer<'static>,
}

impl TestPki {
    pub fn generate(leaf_name: &str, ca_name: &str) -> Self {
        let ca_key = KeyPair::generate().unwrap();
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params.distinguished_name.push(DnType::CommonName, ca_name);
        let ca_cert = ca_params.self_signed(&ca_key).unwrap();

        let leaf_key = KeyPair::generate().unwrap();
        let mut leaf_params = CertificateParams::new(vec![leaf_name.to_string()]).unwrap();
        leaf_params.distinguished_name.push(DnType::CommonName, leaf_name);
        let leaf_cert = leaf_params.signed_by(&leaf_key, &ca_cert, &ca_key).unwrap();

        Self {
            leaf: leaf_cert.der().clone(),
            ca: ca_cert.der().clone(),
            leaf_key: PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
        }
    }

    pub fn chain(&self) -> CertificateChain {
        CertificateChain::from_der_chain(vec![self.leaf.clone(), self.ca.clone()]).unwrap()
    }

    pub fn leaf_certificate(&self) -> Certificate {
        Certificate::from_der(self.leaf.clone()).unwrap()
    }

    pub fn ca_certificate(&self) -> Certificate {
        Certificate::from_der(self.ca.clone()).unwrap()
    }
}

/// Two leaf-plus-CA chains issued by the same CA
pub fn sibling_chains(ca_name: &str, first: &str, second: &str) -> (CertificateChain, CertificateChain) {
    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params.distinguished_name.push(DnType::CommonName, ca_name);
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();

    let issue = |name: &str| {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec![name.to_string()]).unwrap();
        params.distinguished_name.push(DnType::CommonName, name);
        let cert = params.signed_by(&key, &ca_cert, &ca_key).unwrap();
        CertificateChain::from_der_chain(vec![cert.der().clone(), ca_cert.der().clone()]).unwrap()
    };

    (issue(first), issue(second))
}

/// TLS server on 127.0.0.1 that completes handshakes and closes
pub async fn spawn_tls_server(pki: &TestPki) -> SocketAddr {
    let config = ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .unwrap()
    .with_no_client_auth()
    .with_single_cert(vec![pki.leaf.clone(), pki.ca.clone()], pki.leaf_key.clone_key())
    .unwrap();

    let acceptor = TlsAcceptor::from(Arc::new(config));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                let _ = acceptor.accept(stream).await;
            });
        }
    });

    addr
}

/// OpenSSL server on 127.0.0.1 that accepts TLS 1.0 and 1.1 handshakes
pub fn spawn_legacy_tls_server(pki: &TestPki) -> SocketAddr {
    let mut builder = SslAcceptor::mozilla_intermediate(SslMethod::tls()).unwrap();
    builder.set_cipher_list("DEFAULT:@SECLEVEL=0").unwrap();
    builder.set_min_proto_version(Some(SslVersion::TLS1)).unwrap();
    builder.set_max_proto_version(Some(SslVersion::TLS1_1)).unwrap();
    builder
        .set_private_key(&PKey::private_key_from_pkcs8(pki.leaf_key.secret_der()).unwrap())
        .unwrap();
    builder
        .set_certificate(&X509::from_der(pki.leaf.as_ref()).unwrap())
        .unwrap();
    builder
        .add_extra_chain_cert(X509::from_der(pki.ca.as_ref()).unwrap())
        .unwrap();
    let acceptor = builder.build();

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let _ = acceptor.accept(stream);
        }
    });

    addr
}

/// Address nothing listens on
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
