// Certificates module - Certificate parsing, chain walking and expiry checks

pub mod chain;
pub mod expiry;
pub mod parser;

pub use chain::{CertificateChain, walk_chain};
pub use expiry::{ExpiryCheckResult, ExpirySeverity, ExpiryStatus};
pub use parser::{CertificateInfo, IssuerName, SubjectName, parse_certificate};
