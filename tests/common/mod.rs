// Shared helpers for integration tests: throwaway certificates with chosen
// validity windows and a loopback TLS server presenting them.

#![allow(dead_code)]

use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::ssl::{SslAcceptor, SslMethod, SslOptions, SslVersion};
use openssl::x509::extension::{BasicConstraints, SubjectAlternativeName};
use openssl::x509::{X509, X509Builder, X509NameBuilder};
use std::net::{SocketAddr, TcpListener};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

const DAY: i64 = 24 * 60 * 60;

pub struct TestCertificate {
    pub cert: X509,
    pub key: PKey<Private>,
}

/// What to put in a generated certificate
pub struct CertificateSpec<'a> {
    pub common_name: &'a str,
    /// DNS names or IP literals
    pub sans: &'a [&'a str],
    /// Offsets from now, in seconds
    pub not_before: i64,
    pub not_after: i64,
}

impl<'a> CertificateSpec<'a> {
    pub fn new(common_name: &'a str, sans: &'a [&'a str]) -> Self {
        Self {
            common_name,
            sans,
            not_before: -DAY,
            not_after: 365 * DAY,
        }
    }

    pub fn valid_days(mut self, from_days: i64, to_days: i64) -> Self {
        self.not_before = from_days * DAY;
        self.not_after = to_days * DAY;
        self
    }

    /// Not-after in seconds relative to now, for sub-day precision
    pub fn not_after_seconds(mut self, seconds: i64) -> Self {
        self.not_after = seconds;
        self
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

fn generate_key() -> PKey<Private> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
}

fn build(spec: &CertificateSpec<'_>, issuer: Option<&TestCertificate>) -> TestCertificate {
    let key = generate_key();

    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("O", "Certsentry Integration").unwrap();
    name.append_entry_by_text("CN", spec.common_name).unwrap();
    let name = name.build();

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    let mut serial = BigNum::new().unwrap();
    serial.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();
    builder
        .set_serial_number(&serial.to_asn1_integer().unwrap())
        .unwrap();
    builder.set_subject_name(&name).unwrap();
    match issuer {
        Some(ca) => builder.set_issuer_name(ca.cert.subject_name()).unwrap(),
        None => builder.set_issuer_name(&name).unwrap(),
    }

    let now = now_unix();
    builder
        .set_not_before(&Asn1Time::from_unix(now + spec.not_before).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::from_unix(now + spec.not_after).unwrap())
        .unwrap();
    builder.set_pubkey(&key).unwrap();

    if issuer.is_none() {
        builder
            .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
            .unwrap();
    }

    if !spec.sans.is_empty() {
        let mut san = SubjectAlternativeName::new();
        for entry in spec.sans {
            if entry.parse::<std::net::IpAddr>().is_ok() {
                san.ip(entry);
            } else {
                san.dns(entry);
            }
        }
        let extension = san
            .build(&builder.x509v3_context(issuer.map(|ca| &*ca.cert), None))
            .unwrap();
        builder.append_extension(extension).unwrap();
    }

    let signing_key = issuer.map(|ca| &ca.key).unwrap_or(&key);
    builder.sign(signing_key, MessageDigest::sha256()).unwrap();

    TestCertificate {
        cert: builder.build(),
        key,
    }
}

pub fn self_signed(spec: CertificateSpec<'_>) -> TestCertificate {
    build(&spec, None)
}

pub fn issued_by(spec: CertificateSpec<'_>, ca: &TestCertificate) -> TestCertificate {
    build(&spec, Some(ca))
}

/// Serve handshakes on an ephemeral loopback port presenting `leaf` and then
/// `extra_chain`
pub fn spawn_tls_server(leaf: &TestCertificate, extra_chain: &[&TestCertificate]) -> SocketAddr {
    spawn_tls_server_with(leaf, extra_chain, None)
}

/// Like `spawn_tls_server`, but capping the protocol version
pub fn spawn_tls_server_with(
    leaf: &TestCertificate,
    extra_chain: &[&TestCertificate],
    max_version: Option<SslVersion>,
) -> SocketAddr {
    let mut acceptor = SslAcceptor::mozilla_intermediate_v5(SslMethod::tls()).unwrap();
    acceptor.set_private_key(&leaf.key).unwrap();
    acceptor.set_certificate(&leaf.cert).unwrap();
    for extra in extra_chain {
        acceptor.add_extra_chain_cert(extra.cert.clone()).unwrap();
    }
    if let Some(version) = max_version {
        // the intermediate profile disables TLSv1 and TLSv1.1 outright
        acceptor.clear_options(SslOptions::NO_TLSV1 | SslOptions::NO_TLSV1_1);
        acceptor.set_min_proto_version(Some(version)).unwrap();
        acceptor.set_max_proto_version(Some(version)).unwrap();
        acceptor.set_cipher_list("ALL:@SECLEVEL=0").unwrap();
    }
    let acceptor = acceptor.build();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let _ = acceptor.accept(stream);
        }
    });

    addr
}

/// Accept TCP connections and never speak
pub fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });

    addr
}
