//! Errors raised while canonicalizing inputs to address derivation

use alloc::string::String;
use core::fmt::{self, Display, Formatter};

/// Errors stemming from malformed derivation inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// The address is not 20 bytes of hex, or its mixed-case checksum is wrong
    InvalidAddress(String),
    /// The nonce is negative, fractional, or does not fit in 64 bits
    InvalidNonce(String),
}

impl Display for DerivationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DerivationError::InvalidAddress(s) => write!(f, "invalid address: {}", s),
            DerivationError::InvalidNonce(s) => write!(f, "invalid nonce: {}", s),
        }
    }
}
