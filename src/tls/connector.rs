// TLS Connector - bounded-time handshake that captures whatever certificate the
// server presents, trusted or not

use super::peer::PeerCertificateHandle;
use crate::error::ScanError;
use crate::utils::network::resolve_hostname;
use openssl::ssl::{SslConnector, SslConnectorBuilder, SslMethod, SslOptions, SslVerifyMode, SslVersion};
use std::io;
use std::net::{IpAddr, Shutdown, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// What a completed handshake yielded
#[derive(Debug, Clone)]
pub struct TlsConnection {
    pub peer: PeerCertificateHandle,
    /// Negotiated protocol, e.g. "TLSv1.3"
    pub tls_version: Option<String>,
    /// Negotiated cipher suite name
    pub cipher_suite: Option<String>,
}

/// Owns a second handle on the scan socket and shuts it down when dropped.
///
/// Dropping the connect future (timeout) drops the guard, which unblocks a
/// handshake still running on the blocking pool.
struct SocketGuard {
    socket: std::net::TcpStream,
}

impl Drop for SocketGuard {
    fn drop(&mut self) {
        if let Err(e) = self.socket.shutdown(Shutdown::Both) {
            trace!("Socket shutdown: {}", e);
        }
    }
}

/// Handshake-only TLS client
///
/// Peer verification is disabled on purpose: expired, self-signed and
/// mismatched certificates must still be captured. No application data is
/// ever written to the connection.
#[derive(Debug, Clone)]
pub struct TlsConnector {
    timeout: Duration,
}

impl TlsConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve, connect and handshake with `host:port` within the timeout budget
    pub async fn connect(&self, host: &str, port: u16) -> Result<TlsConnection, ScanError> {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        match timeout(self.timeout, self.connect_unbounded(host, port)).await {
            Ok(result) => result,
            Err(_) => {
                debug!("Handshake with {}:{} timed out after {}ms", host, port, timeout_ms);
                Err(ScanError::Timeout { timeout_ms })
            }
        }
    }

    async fn connect_unbounded(&self, host: &str, port: u16) -> Result<TlsConnection, ScanError> {
        let addresses = resolve_hostname(host).await?;
        let stream = connect_any(&addresses, port).await?;

        let std_stream = stream.into_std()?;
        std_stream.set_nonblocking(false)?;
        std_stream.set_read_timeout(Some(self.timeout))?;
        std_stream.set_write_timeout(Some(self.timeout))?;

        let _guard = SocketGuard {
            socket: std_stream.try_clone()?,
        };

        let hostname = host.to_string();
        tokio::task::spawn_blocking(move || handshake(std_stream, &hostname)).await?
    }
}

async fn connect_any(addresses: &[IpAddr], port: u16) -> Result<TcpStream, ScanError> {
    let mut last_error = None;

    for ip in addresses {
        let addr = SocketAddr::new(*ip, port);
        trace!("Connecting to {}", addr);

        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                last_error = Some(ScanError::ConnectionRefused { addr });
            }
            Err(source) => {
                last_error = Some(ScanError::Connect { addr, source });
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ScanError::invalid_input("no addresses to connect to")))
}

/// Permissive client context: no verification, SSLv3 and up, every cipher
fn connector_builder() -> Result<SslConnectorBuilder, ScanError> {
    let mut builder = SslConnector::builder(SslMethod::tls())?;
    builder.set_verify(SslVerifyMode::NONE);
    // Legacy servers must still be inspectable; the builder disables SSLv3 by default
    builder.clear_options(SslOptions::NO_SSLV3);
    builder.set_min_proto_version(Some(SslVersion::SSL3))?;
    builder.set_cipher_list("ALL:@SECLEVEL=0")?;
    Ok(builder)
}

fn handshake(stream: std::net::TcpStream, host: &str) -> Result<TlsConnection, ScanError> {
    let connector = connector_builder()?.build();

    let mut config = connector.configure()?;
    config.set_verify_hostname(false);
    config.set_use_server_name_indication(host.parse::<IpAddr>().is_err());

    let tls_stream = config
        .connect(host, stream)
        .map_err(|e| ScanError::Handshake {
            details: e.to_string(),
        })?;

    let ssl = tls_stream.ssl();
    let tls_version = Some(ssl.version_str().to_string());
    let cipher_suite = ssl.current_cipher().map(|c| c.name().to_string());

    let peer = match ssl.peer_cert_chain() {
        Some(chain) if chain.len() > 0 => PeerCertificateHandle::from_x509_chain(chain.iter())?,
        _ => match ssl.peer_certificate() {
            Some(cert) => PeerCertificateHandle::from_x509_chain([&*cert])?,
            None => PeerCertificateHandle::default(),
        },
    };

    debug!(
        "Handshake with {} complete: {} / {}",
        host,
        tls_version.as_deref().unwrap_or("unknown"),
        cipher_suite.as_deref().unwrap_or("unknown")
    );

    if !peer.has_certificate() {
        return Err(ScanError::NoCertificate);
    }

    Ok(TlsConnection {
        peer,
        tls_version,
        cipher_suite,
    })
}
