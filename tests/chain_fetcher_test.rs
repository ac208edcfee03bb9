// Certificate chain fetcher integration tests
//
// Copyright (C) 2025 Marc Rivero López
// Licensed under the GNU General Public License v3.0

mod common;

use common::{TestPki, closed_port, spawn_legacy_tls_server, spawn_tls_server};
use std::time::Duration;
use trustharvest::HarvestError;
use trustharvest::tls::{CertificateChainFetcher, ChainFetcher, TlsProtocol};
use url::Url;

#[tokio::test]
async fn test_fetch_captures_presented_chain_without_validation() {
    let pki = TestPki::generate("localhost", "Harvest Test Root");
    let addr = spawn_tls_server(&pki).await;
    let url = Url::parse(&format!("https://127.0.0.1:{}/", addr.port())).unwrap();

    let fetcher = CertificateChainFetcher::new(TlsProtocol::default());
    let chain = fetcher.fetch(&url).await.unwrap();

    assert_eq!(chain.len(), 2);
    assert_eq!(chain.simple_names(), vec!["localhost", "Harvest Test Root"]);
    assert_eq!(chain.leaf().unwrap(), &pki.leaf_certificate());
}

#[tokio::test]
async fn test_fetch_honours_each_protocol() {
    let pki = TestPki::generate("localhost", "Harvest Test Root");
    let addr = spawn_tls_server(&pki).await;
    let url = Url::parse(&format!("https://127.0.0.1:{}/", addr.port())).unwrap();

    for protocol in TlsProtocol::all().into_iter().filter(|p| !p.is_legacy()) {
        let fetcher = CertificateChainFetcher::new(protocol);
        let chain = fetcher.fetch(&url).await.unwrap();
        assert_eq!(chain.len(), 2, "protocol {}", protocol);
    }
}

#[tokio::test]
async fn test_fetch_legacy_protocols_through_openssl() {
    let pki = TestPki::generate("localhost", "Legacy Test Root");
    let addr = spawn_legacy_tls_server(&pki);
    let url = Url::parse(&format!("https://127.0.0.1:{}/", addr.port())).unwrap();

    for protocol in [TlsProtocol::Tls10, TlsProtocol::Tls11] {
        let fetcher = CertificateChainFetcher::new(protocol);
        let chain = fetcher.fetch(&url).await.unwrap();

        assert_eq!(
            chain.simple_names(),
            vec!["localhost", "Legacy Test Root"],
            "protocol {}",
            protocol
        );
        assert_eq!(chain.leaf().unwrap(), &pki.leaf_certificate());
    }
}

#[tokio::test]
async fn test_fetch_legacy_protocol_against_modern_server_fails() {
    let pki = TestPki::generate("localhost", "Harvest Test Root");
    let addr = spawn_tls_server(&pki).await;
    let url = Url::parse(&format!("https://127.0.0.1:{}/", addr.port())).unwrap();

    let fetcher = CertificateChainFetcher::new(TlsProtocol::Tls11)
        .with_timeouts(Duration::from_secs(2), Duration::from_secs(2));
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, HarvestError::Handshake { .. }));
}

#[tokio::test]
async fn test_fetch_refused_connection_is_technical_error() {
    let addr = closed_port().await;
    let url = Url::parse(&format!("https://127.0.0.1:{}/", addr.port())).unwrap();

    let fetcher = CertificateChainFetcher::new(TlsProtocol::default())
        .with_timeouts(Duration::from_secs(2), Duration::from_secs(2));
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, HarvestError::Handshake { .. }));
    assert!(err.to_string().contains(&url.to_string()));
    assert!(!err.is_input_error());
}

#[tokio::test]
async fn test_fetch_plain_tcp_peer_fails_handshake() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        // Accept and close without speaking TLS
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });

    let url = Url::parse(&format!("https://127.0.0.1:{}/", port)).unwrap();
    let fetcher = CertificateChainFetcher::new(TlsProtocol::default());
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, HarvestError::Handshake { .. }));
}
