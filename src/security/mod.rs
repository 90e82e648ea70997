//! Security Module
//!
//! Input validation for everything a caller can hand to the scanner.

pub mod input_validation;

pub use input_validation::{
    ValidationError, validate_hostname, validate_port, validate_target, validate_timeout_ms,
    validate_warn_days,
};
