// Legacy handshake - OpenSSL connection for TLS versions rustls does not negotiate

use super::TlsProtocol;
use super::capture::RawChain;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use rustls_pki_types::CertificateDer;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Handshake with `host:port` pinned to `protocol` and return the chain the server sent
///
/// The peer is not verified. An empty chain means the server presented none.
pub async fn capture_chain(
    protocol: TlsProtocol,
    host: &str,
    port: u16,
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<RawChain, String> {
    let stream = timeout(connect_timeout, TcpStream::connect((host, port)))
        .await
        .map_err(|_| format!("Connection timeout after {:?}", connect_timeout))?
        .map_err(|e| e.to_string())?;

    // OpenSSL drives a blocking socket
    let std_stream = stream.into_std().map_err(|e| e.to_string())?;
    std_stream.set_nonblocking(false).map_err(|e| e.to_string())?;
    std_stream
        .set_read_timeout(Some(read_timeout))
        .map_err(|e| e.to_string())?;
    std_stream
        .set_write_timeout(Some(read_timeout))
        .map_err(|e| e.to_string())?;

    let host = host.to_string();
    tokio::task::spawn_blocking(move || -> Result<RawChain, String> {
        let (min_version, max_version) = protocol.openssl_bounds();

        let mut builder = SslConnector::builder(SslMethod::tls()).map_err(|e| e.to_string())?;
        builder.set_verify(SslVerifyMode::NONE);
        // TLS 1.0 and 1.1 are refused above security level 0
        builder
            .set_cipher_list("DEFAULT:@SECLEVEL=0")
            .map_err(|e| e.to_string())?;
        builder
            .set_min_proto_version(Some(min_version))
            .map_err(|e| e.to_string())?;
        builder
            .set_max_proto_version(Some(max_version))
            .map_err(|e| e.to_string())?;
        let connector = builder.build();

        let tls_stream = connector
            .configure()
            .map_err(|e| e.to_string())?
            .verify_hostname(false)
            .connect(&host, std_stream)
            .map_err(|e| e.to_string())?;

        let Some(stack) = tls_stream.ssl().peer_cert_chain() else {
            return Ok(Vec::new());
        };
        stack
            .iter()
            .map(|cert| {
                cert.to_der()
                    .map(CertificateDer::from)
                    .map_err(|e| e.to_string())
            })
            .collect()
    })
    .await
    .map_err(|e| format!("Handshake task failed: {}", e))?
}
