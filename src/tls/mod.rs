// TLS module - handshake and peer certificate capture

pub mod connector;
pub mod peer;

#[cfg(test)]
pub(crate) mod test_support;

pub use connector::{TlsConnection, TlsConnector};
pub use peer::{DistinguishedName, PeerCertificateHandle, RawPeerCertificate};
