//! Type definitions for the inputs to contract address derivation

use alloc::{format, vec::Vec};
use core::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use alloy_primitives::Address;

use crate::{
    address::{derive_contract_address, parse_address},
    constants::{HEX_PREFIX, HEX_PREFIX_UPPER, NUM_BYTES_U64},
    errors::DerivationError,
};

/// The number of transactions an account has sent, which for a contract-creating
/// transaction doubles as the uniqueness input to the created contract's address.
///
/// Ledger nonces are bounded by `2^64 - 1` (EIP-2681), so a `u64` covers every
/// nonce a sender can actually reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(u64);

impl Nonce {
    /// The nonce of an account that has never sent a transaction
    pub const ZERO: Nonce = Nonce(0);

    /// Wrap a raw nonce value
    pub const fn new(value: u64) -> Self {
        Nonce(value)
    }

    /// Parse a nonce from a big-endian byte string.
    ///
    /// Leading zero bytes are ignored and the empty byte string is zero.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, DerivationError> {
        let first_significant = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let significant = &bytes[first_significant..];
        if significant.len() > NUM_BYTES_U64 {
            return Err(DerivationError::InvalidNonce(format!(
                "{} significant bytes exceeds the {}-byte nonce width",
                significant.len(),
                NUM_BYTES_U64
            )));
        }

        let mut buf = [0u8; NUM_BYTES_U64];
        buf[NUM_BYTES_U64 - significant.len()..].copy_from_slice(significant);
        Ok(Nonce(u64::from_be_bytes(buf)))
    }

    /// The minimal big-endian encoding of the nonce, with no leading zero bytes.
    /// Zero encodes as the empty byte string.
    pub fn to_be_bytes_trimmed(self) -> Vec<u8> {
        let leading_zero_bytes = (self.0.leading_zeros() / 8) as usize;
        self.0.to_be_bytes()[leading_zero_bytes..].to_vec()
    }
}

impl From<u64> for Nonce {
    fn from(value: u64) -> Self {
        Nonce(value)
    }
}

impl TryFrom<i64> for Nonce {
    type Error = DerivationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map(Nonce)
            .map_err(|_| DerivationError::InvalidNonce(format!("{} is negative", value)))
    }
}

impl FromStr for Nonce {
    type Err = DerivationError;

    /// Parses decimal digits or `0x`-prefixed hex. A bare `0x` denotes the
    /// empty byte string, i.e. zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(DerivationError::InvalidNonce(format!("{} is negative", s)));
        }

        let (digits, radix) = match s
            .strip_prefix(HEX_PREFIX)
            .or_else(|| s.strip_prefix(HEX_PREFIX_UPPER))
        {
            Some("") => return Ok(Nonce::ZERO),
            Some(hex_digits) => (hex_digits, 16),
            None => (s, 10),
        };

        // The integer parsers accept a leading `+`, which is not a digit
        if !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(DerivationError::InvalidNonce(format!(
                "{:?} contains a non-digit",
                s
            )));
        }

        u64::from_str_radix(digits, radix)
            .map(Nonce)
            .map_err(|e| DerivationError::InvalidNonce(format!("{:?}: {}", s, e)))
    }
}

impl Display for Nonce {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account address paired with the nonce of the contract-creating
/// transaction it is about to send
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployerIdentity {
    /// The sender of the contract-creating transaction
    pub address: Address,
    /// The nonce of the contract-creating transaction
    pub nonce: Nonce,
}

impl DeployerIdentity {
    /// Pair an address with a nonce
    pub fn new(address: Address, nonce: impl Into<Nonce>) -> Self {
        DeployerIdentity {
            address,
            nonce: nonce.into(),
        }
    }

    /// Canonicalize a textual address & nonce into a deployer identity
    pub fn parse(address: &str, nonce: &str) -> Result<Self, DerivationError> {
        Ok(DeployerIdentity {
            address: parse_address(address)?,
            nonce: nonce.parse()?,
        })
    }

    /// The address of the contract this identity will create
    pub fn contract_address(&self) -> Address {
        derive_contract_address(&self.address, self.nonce)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::errors::DerivationError;

    use super::Nonce;

    #[test]
    fn test_zero_representations() {
        assert_eq!("0".parse::<Nonce>().unwrap(), Nonce::ZERO);
        assert_eq!("0x0".parse::<Nonce>().unwrap(), Nonce::ZERO);
        assert_eq!("0x".parse::<Nonce>().unwrap(), Nonce::ZERO);
        assert_eq!(Nonce::from_be_bytes(&[]).unwrap(), Nonce::ZERO);
        assert_eq!(Nonce::from_be_bytes(&[0, 0, 0]).unwrap(), Nonce::ZERO);
        assert_eq!(Nonce::try_from(0i64).unwrap(), Nonce::ZERO);
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!("42".parse::<Nonce>().unwrap(), Nonce::new(42));
        assert_eq!("0x2a".parse::<Nonce>().unwrap(), Nonce::new(42));
        assert_eq!("0X2A".parse::<Nonce>().unwrap(), Nonce::new(42));
        assert_eq!(" 7 ".parse::<Nonce>().unwrap(), Nonce::new(7));
        assert_eq!(
            "18446744073709551615".parse::<Nonce>().unwrap(),
            Nonce::new(u64::MAX)
        );
    }

    #[test]
    fn test_negative_nonce_rejected() {
        assert!(matches!(
            "-1".parse::<Nonce>(),
            Err(DerivationError::InvalidNonce(_))
        ));
        assert!(matches!(
            Nonce::try_from(-1i64),
            Err(DerivationError::InvalidNonce(_))
        ));
    }

    #[test]
    fn test_non_integer_nonce_rejected() {
        for input in [
            "1.5",
            "",
            "abc",
            "0xzz",
            "1e3",
            "18446744073709551616",
            "+5",
            "0x+ff",
            "0x-1",
            "1_000",
        ] {
            assert!(
                matches!(input.parse::<Nonce>(), Err(DerivationError::InvalidNonce(_))),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn test_be_bytes_too_wide() {
        let bytes = [1u8; 9];
        assert!(matches!(
            Nonce::from_be_bytes(&bytes),
            Err(DerivationError::InvalidNonce(_))
        ));

        // Leading zeros don't count against the width
        let mut padded = vec![0u8; 24];
        padded.push(5);
        assert_eq!(Nonce::from_be_bytes(&padded).unwrap(), Nonce::new(5));
    }

    #[test]
    fn test_trimmed_encoding() {
        assert!(Nonce::ZERO.to_be_bytes_trimmed().is_empty());
        assert_eq!(Nonce::new(1).to_be_bytes_trimmed(), vec![0x01]);
        assert_eq!(Nonce::new(0x80).to_be_bytes_trimmed(), vec![0x80]);
        assert_eq!(Nonce::new(0x0100).to_be_bytes_trimmed(), vec![0x01, 0x00]);
        assert_eq!(Nonce::new(u64::MAX).to_be_bytes_trimmed(), vec![0xff; 8]);

        let nonce = Nonce::new(0x01_02_03);
        assert_eq!(
            Nonce::from_be_bytes(&nonce.to_be_bytes_trimmed()).unwrap(),
            nonce
        );
    }
}
