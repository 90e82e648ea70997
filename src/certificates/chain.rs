// Chain Walker - follow issuer links from the leaf to the top of the presented
// chain

use super::parser::{CertificateInfo, parse_certificate};
use crate::constants::MAX_CHAIN_DEPTH;
use crate::error::ScanError;
use crate::tls::peer::PeerCertificateHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Certificate chain as the server presented it (not trust-validated)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateChain {
    pub leaf: CertificateInfo,
    pub intermediates: Vec<CertificateInfo>,
    /// Top of the chain; only present when more than one certificate was seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<CertificateInfo>,
}

impl CertificateChain {
    /// Split an ordered leaf-first list into leaf, intermediates and root
    pub fn from_ordered(mut certificates: Vec<CertificateInfo>) -> Option<Self> {
        if certificates.is_empty() {
            return None;
        }

        let leaf = certificates.remove(0);
        let root = certificates.pop();

        Some(Self {
            leaf,
            intermediates: certificates,
            root,
        })
    }

    pub fn len(&self) -> usize {
        1 + self.intermediates.len() + usize::from(self.root.is_some())
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// A chain is complete when it reaches a root
    pub fn is_complete(&self) -> bool {
        self.root.is_some()
    }

    /// Leaf first, root last
    pub fn iter(&self) -> impl Iterator<Item = &CertificateInfo> {
        std::iter::once(&self.leaf)
            .chain(self.intermediates.iter())
            .chain(self.root.iter())
    }
}

/// Walk the issuer links of a peer handle, starting at the leaf.
///
/// Stops when a certificate has no issuer link, links to itself, links to an
/// entry already visited, or when `MAX_CHAIN_DEPTH` certificates have been
/// collected. A leaf that cannot be parsed is an error; an unparseable
/// certificate further up ends the walk at the last good entry.
pub fn walk_chain(handle: &PeerCertificateHandle) -> Result<CertificateChain, ScanError> {
    let leaf = handle.leaf().ok_or(ScanError::NoCertificate)?;
    let mut ordered = vec![parse_certificate(leaf)?];

    let mut visited = HashSet::from([0usize]);
    let mut current = 0usize;
    let mut link = leaf.issuer_link;

    while let Some(next) = link {
        if next == current {
            break;
        }
        if !visited.insert(next) {
            warn!("Issuer cycle detected at chain index {}, stopping walk", next);
            break;
        }
        if ordered.len() >= MAX_CHAIN_DEPTH {
            warn!(
                "Certificate chain exceeds {} entries, truncating",
                MAX_CHAIN_DEPTH
            );
            break;
        }

        let Some(raw) = handle.get(next) else {
            warn!("Issuer link points outside the presented chain ({})", next);
            break;
        };

        match parse_certificate(raw) {
            Ok(info) => ordered.push(info),
            Err(e) => {
                warn!("Skipping rest of chain at index {}: {}", next, e);
                break;
            }
        }

        current = next;
        link = raw.issuer_link;
    }

    CertificateChain::from_ordered(ordered).ok_or(ScanError::NoCertificate)
}
