// Chain capture - Records the certificate chains a peer presents during a handshake
//
// The verifier below is wired into rustls where certificate validation would
// normally happen. It validates nothing: it hands every chain to a
// `ChainRecorder` and accepts the handshake.

use super::TlsProtocol;
use crate::{HarvestError, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use rustls_pki_types::{CertificateDer, ServerName, UnixTime};
use std::fmt;
use std::sync::{Arc, Mutex};

/// DER certificates in the order the peer sent them, leaf first
pub type RawChain = Vec<CertificateDer<'static>>;

/// Capability for observing chains seen during a handshake
pub trait ChainRecorder: Send + Sync + fmt::Debug {
    fn record_server_chain(&self, chain: RawChain);
    fn record_client_chain(&self, chain: RawChain);
}

/// Recorder that keeps every chain it is given
#[derive(Debug, Default)]
pub struct ChainAccumulator {
    server_chains: Mutex<Vec<RawChain>>,
    client_chains: Mutex<Vec<RawChain>>,
}

impl ChainAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server_chains(&self) -> Vec<RawChain> {
        self.server_chains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn client_chains(&self) -> Vec<RawChain> {
        self.client_chains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ChainRecorder for ChainAccumulator {
    fn record_server_chain(&self, chain: RawChain) {
        tracing::debug!("Recorded server chain with {} certificate(s)", chain.len());
        self.server_chains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(chain);
    }

    fn record_client_chain(&self, chain: RawChain) {
        tracing::debug!("Recorded client chain with {} certificate(s)", chain.len());
        self.client_chains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(chain);
    }
}

/// Server certificate "verifier" that forwards chains to a recorder
#[derive(Debug)]
pub struct CapturingVerifier {
    recorder: Arc<dyn ChainRecorder>,
    schemes: Vec<SignatureScheme>,
}

impl CapturingVerifier {
    pub fn new(recorder: Arc<dyn ChainRecorder>, provider: &CryptoProvider) -> Self {
        Self {
            recorder,
            schemes: provider.signature_verification_algorithms.supported_schemes(),
        }
    }
}

impl ServerCertVerifier for CapturingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        let mut chain = Vec::with_capacity(intermediates.len() + 1);
        chain.push(end_entity.clone().into_owned());
        chain.extend(intermediates.iter().map(|cert| cert.clone().into_owned()));

        self.recorder.record_server_chain(chain);
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.schemes.clone()
    }
}

/// Build a client config whose only certificate hook is the given recorder
pub fn capturing_client_config(
    protocol: TlsProtocol,
    recorder: Arc<dyn ChainRecorder>,
) -> Result<ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = Arc::new(CapturingVerifier::new(recorder, &provider));

    let config = ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(protocol.rustls_versions())
        .map_err(|source| HarvestError::TlsConfig { source })?
        .dangerous()
        .with_custom_certificate_verifier(verifier)
        .with_no_client_auth();

    Ok(config)
}
