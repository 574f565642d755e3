//! Canonicalization of textual addresses and derivation of the address a
//! contract is assigned when created by a given sender at a given nonce.
//!
//! The derivation reproduces the ledger's `CREATE` rule:
//! `keccak256(rlp([sender, nonce]))[12..]`

use alloc::{
    format,
    string::{String, ToString},
};

use alloy_primitives::{hex, keccak256, Address};

use crate::{
    constants::{
        HEX_PREFIX, HEX_PREFIX_UPPER, NUM_BYTES_ADDRESS, NUM_BYTES_HASH, NUM_HEX_DIGITS_ADDRESS,
    },
    errors::DerivationError,
    rlp::creation_preimage,
    types::{DeployerIdentity, Nonce},
};

/// Parse a textual address into its raw 20-byte form.
///
/// Accepts 40 hex digits with an optional `0x` prefix. Uniformly lowercase or
/// uppercase digits carry no checksum; mixed-case input must match its EIP-55
/// checksum exactly.
pub fn parse_address(s: &str) -> Result<Address, DerivationError> {
    let digits = s
        .strip_prefix(HEX_PREFIX)
        .or_else(|| s.strip_prefix(HEX_PREFIX_UPPER))
        .unwrap_or(s);

    if digits.len() != NUM_HEX_DIGITS_ADDRESS {
        return Err(DerivationError::InvalidAddress(format!(
            "expected {} hex digits, got {}",
            NUM_HEX_DIGITS_ADDRESS,
            digits.len()
        )));
    }

    let mut bytes = [0u8; NUM_BYTES_ADDRESS];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|e| DerivationError::InvalidAddress(e.to_string()))?;
    let address = Address::from(bytes);

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = to_checksummed(&address);
        if checksummed[HEX_PREFIX.len()..] != *digits {
            return Err(DerivationError::InvalidAddress(format!(
                "checksum mismatch, expected {}",
                checksummed
            )));
        }
    }

    Ok(address)
}

/// Render an address in its EIP-55 mixed-case checksummed form
pub fn to_checksummed(address: &Address) -> String {
    address.to_checksum(None /* chain_id */)
}

/// Derive the address the ledger assigns to the contract created by `sender`
/// in its transaction with the given nonce
pub fn derive_contract_address(sender: &Address, nonce: Nonce) -> Address {
    let hash = keccak256(creation_preimage(sender, nonce));
    Address::from_slice(&hash[NUM_BYTES_HASH - NUM_BYTES_ADDRESS..])
}

/// Derive a contract address from textual inputs, returning the checksummed
/// address.
///
/// Fails without a partial result if either input is malformed.
pub fn derive_contract_address_str(sender: &str, nonce: &str) -> Result<String, DerivationError> {
    let identity = DeployerIdentity::parse(sender, nonce)?;
    Ok(to_checksummed(&identity.contract_address()))
}
