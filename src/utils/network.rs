// Network utilities - target parsing and DNS resolution

use crate::constants::DEFAULT_PORT;
use crate::error::ScanError;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::*;
use std::fmt;
use std::net::IpAddr;

/// A scan target: host plus port
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub hostname: String,
    pub port: u16,
}

impl Target {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
        }
    }

    /// Parse target from string (URL, `host:port`, `[v6]:port` or just host).
    ///
    /// `default_port` applies when the input names no port.
    pub fn parse(input: &str, default_port: u16) -> Result<Self, ScanError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ScanError::invalid_input("target cannot be empty"));
        }

        if input.contains("://") {
            // URL format (https://example.com:443/path)
            let url = url::Url::parse(input)
                .map_err(|e| ScanError::invalid_input(format!("invalid URL {}: {}", input, e)))?;
            let host = url
                .host_str()
                .ok_or_else(|| ScanError::invalid_input(format!("no hostname in URL {}", input)))?
                .trim_start_matches('[')
                .trim_end_matches(']')
                .to_string();
            let port = url.port().unwrap_or(DEFAULT_PORT);
            return Ok(Self::new(host, port));
        }

        // Bare IPv6 literal
        if input.parse::<IpAddr>().is_ok() {
            return Ok(Self::new(input, default_port));
        }

        // [v6]:port
        if let Some(rest) = input.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| ScanError::invalid_input(format!("unterminated IPv6 literal: {}", input)))?;
            let port = match tail.strip_prefix(':') {
                Some(port_str) => parse_port(port_str)?,
                None => default_port,
            };
            return Ok(Self::new(host, port));
        }

        if let Some((host, port_str)) = input.rsplit_once(':') {
            return Ok(Self::new(host, parse_port(port_str)?));
        }

        Ok(Self::new(input, default_port))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hostname.contains(':') {
            write!(f, "[{}]:{}", self.hostname, self.port)
        } else {
            write!(f, "{}:{}", self.hostname, self.port)
        }
    }
}

/// Resolve hostname to IP addresses
pub async fn resolve_hostname(hostname: &str) -> Result<Vec<IpAddr>, ScanError> {
    // Check if it's already an IP address
    if let Ok(ip) = hostname.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    let response = resolver
        .lookup_ip(hostname)
        .await
        .map_err(|e| ScanError::DnsResolution {
            hostname: hostname.to_string(),
            details: e.to_string(),
        })?;

    let ips: Vec<IpAddr> = response.iter().collect();

    if ips.is_empty() {
        return Err(ScanError::DnsResolution {
            hostname: hostname.to_string(),
            details: "no addresses found".to_string(),
        });
    }

    Ok(ips)
}

/// Parse port from string
pub fn parse_port(port_str: &str) -> Result<u16, ScanError> {
    match port_str.parse::<u16>() {
        Ok(0) | Err(_) => Err(ScanError::invalid_input(format!(
            "invalid port number: {}",
            port_str
        ))),
        Ok(port) => Ok(port),
    }
}
