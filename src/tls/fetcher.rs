// Certificate chain fetcher - Handshake-only TLS connection that captures the server chain

use super::TlsProtocol;
use super::capture::{ChainAccumulator, ChainRecorder, RawChain, capturing_client_config};
use super::legacy;
use crate::certificates::parser::CertificateChain;
use crate::{HarvestError, Result};
use async_trait::async_trait;
use rustls_pki_types::ServerName;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use url::{Host, Url};

const DEFAULT_TLS_PORT: u16 = 443;

/// Source of certificate chains for endpoint URLs
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<CertificateChain>;
}

/// Fetches the chain a server presents, without validating it
#[derive(Debug, Clone)]
pub struct CertificateChainFetcher {
    protocol: TlsProtocol,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl CertificateChainFetcher {
    pub fn new(protocol: TlsProtocol) -> Self {
        Self {
            protocol,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, read_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.read_timeout = read_timeout;
        self
    }

    pub fn protocol(&self) -> TlsProtocol {
        self.protocol
    }

    /// Connect and run the TLS handshake; the stream is dropped on return
    async fn handshake(
        &self,
        url: &Url,
        recorder: Arc<dyn ChainRecorder>,
    ) -> std::result::Result<(), String> {
        let host = url.host().ok_or_else(|| "URL has no host".to_string())?;
        let port = url.port().unwrap_or(DEFAULT_TLS_PORT);

        let (connect_host, server_name) = match host {
            Host::Domain(domain) => {
                let name = ServerName::try_from(domain.to_string())
                    .map_err(|e| format!("Invalid DNS name {}: {}", domain, e))?;
                (domain.to_string(), name)
            }
            Host::Ipv4(ip) => (ip.to_string(), ServerName::from(IpAddr::V4(ip))),
            Host::Ipv6(ip) => (ip.to_string(), ServerName::from(IpAddr::V6(ip))),
        };

        let config = capturing_client_config(self.protocol, recorder).map_err(|e| e.to_string())?;
        let connector = TlsConnector::from(Arc::new(config));

        let stream = timeout(
            self.connect_timeout,
            TcpStream::connect((connect_host.as_str(), port)),
        )
        .await
        .map_err(|_| format!("Connection timeout after {:?}", self.connect_timeout))?
        .map_err(|e| e.to_string())?;

        let tls_stream = timeout(self.read_timeout, connector.connect(server_name, stream))
            .await
            .map_err(|_| format!("Handshake timeout after {:?}", self.read_timeout))?
            .map_err(|e| e.to_string())?;

        drop(tls_stream);
        Ok(())
    }

    /// Handshake through OpenSSL for the versions rustls cannot speak
    async fn legacy_handshake(&self, url: &Url) -> std::result::Result<RawChain, String> {
        let host = url.host().ok_or_else(|| "URL has no host".to_string())?;
        let port = url.port().unwrap_or(DEFAULT_TLS_PORT);
        let connect_host = match host {
            Host::Domain(domain) => domain.to_string(),
            Host::Ipv4(ip) => ip.to_string(),
            Host::Ipv6(ip) => ip.to_string(),
        };

        legacy::capture_chain(
            self.protocol,
            &connect_host,
            port,
            self.connect_timeout,
            self.read_timeout,
        )
        .await
    }
}

#[async_trait]
impl ChainFetcher for CertificateChainFetcher {
    async fn fetch(&self, url: &Url) -> Result<CertificateChain> {
        tracing::debug!("Fetching certificate chain from {} using {}", url, self.protocol);

        let captured = if self.protocol.is_legacy() {
            self.legacy_handshake(url).await.map(|chain| vec![chain])
        } else {
            let accumulator = Arc::new(ChainAccumulator::new());
            self.handshake(url, accumulator.clone())
                .await
                .map(|()| accumulator.server_chains())
        };

        let mut chains = captured.map_err(|reason| HarvestError::Handshake {
            url: url.to_string(),
            reason,
        })?;
        chains.retain(|chain| !chain.is_empty());

        match chains.len() {
            0 => Err(HarvestError::NoChainCaptured {
                url: url.to_string(),
            }),
            1 => CertificateChain::from_der_chain(chains.remove(0)),
            count => Err(HarvestError::MultipleChainsCaptured {
                url: url.to_string(),
                count,
            }),
        }
    }
}
