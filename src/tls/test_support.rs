// Throwaway certificates and a loopback TLS server for unit tests

use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::ssl::{SslAcceptor, SslMethod};
use openssl::x509::extension::{BasicConstraints, SubjectAlternativeName};
use openssl::x509::{X509, X509Builder, X509Name, X509NameBuilder};
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::thread;

fn generate_key() -> PKey<Private> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
}

fn build_name(common_name: &str) -> X509Name {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_text("C", "DE").unwrap();
    name.append_entry_by_text("O", "Certsentry Test").unwrap();
    name.append_entry_by_text("CN", common_name).unwrap();
    name.build()
}

fn base_builder(subject: &X509Name, key: &PKey<Private>) -> X509Builder {
    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();

    let mut serial = BigNum::new().unwrap();
    serial.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();
    builder
        .set_serial_number(&serial.to_asn1_integer().unwrap())
        .unwrap();

    builder.set_subject_name(subject).unwrap();
    builder
        .set_not_before(&Asn1Time::days_from_now(0).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::days_from_now(365).unwrap())
        .unwrap();
    builder.set_pubkey(key).unwrap();
    builder
}

fn add_sans(builder: &mut X509Builder, sans: &[&str], issuer: Option<&X509>) {
    if sans.is_empty() {
        return;
    }
    let mut san = SubjectAlternativeName::new();
    for entry in sans {
        if entry.parse::<IpAddr>().is_ok() {
            san.ip(entry);
        } else {
            san.dns(entry);
        }
    }
    let extension = san
        .build(&builder.x509v3_context(issuer.map(|c| &**c), None))
        .unwrap();
    builder.append_extension(extension).unwrap();
}

/// Self-signed certificate valid for the next year
pub fn build_self_signed_certificate(common_name: &str, sans: &[&str]) -> (X509, PKey<Private>) {
    let key = generate_key();
    let name = build_name(common_name);

    let mut builder = base_builder(&name, &key);
    builder.set_issuer_name(&name).unwrap();
    builder
        .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
        .unwrap();
    add_sans(&mut builder, sans, None);
    builder.sign(&key, MessageDigest::sha256()).unwrap();

    (builder.build(), key)
}

/// Leaf certificate issued by `ca`, with the common name as its only SAN
pub fn build_ca_signed_certificate(
    common_name: &str,
    ca: &X509,
    ca_key: &PKey<Private>,
) -> (X509, PKey<Private>) {
    let key = generate_key();
    let name = build_name(common_name);

    let mut builder = base_builder(&name, &key);
    builder.set_issuer_name(ca.subject_name()).unwrap();
    add_sans(&mut builder, &[common_name], Some(ca));
    builder.sign(ca_key, MessageDigest::sha256()).unwrap();

    (builder.build(), key)
}

/// Serve TLS handshakes on an ephemeral loopback port, presenting `cert`
/// followed by `extra_chain`. Each accepted connection is handshaken once and
/// then dropped.
pub fn spawn_tls_server(cert: X509, key: PKey<Private>, extra_chain: Vec<X509>) -> SocketAddr {
    let mut acceptor = SslAcceptor::mozilla_intermediate_v5(SslMethod::tls()).unwrap();
    acceptor.set_private_key(&key).unwrap();
    acceptor.set_certificate(&cert).unwrap();
    for extra in extra_chain {
        acceptor.add_extra_chain_cert(extra).unwrap();
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

/// Accept TCP connections but never answer the ClientHello
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
