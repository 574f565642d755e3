//! Constants that parameterize address parsing & derivation

/// The number of bytes it takes to represent an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The number of bytes in a Keccak-256 digest
pub const NUM_BYTES_HASH: usize = 32;

/// The number of bytes it takes to represent a u64
pub const NUM_BYTES_U64: usize = 8;

/// The number of hex digits in a textual address, excluding the prefix
pub const NUM_HEX_DIGITS_ADDRESS: usize = NUM_BYTES_ADDRESS * 2;

/// The prefix of hex-encoded values
pub const HEX_PREFIX: &str = "0x";

/// The uppercase variant of the hex prefix, tolerated on input
pub const HEX_PREFIX_UPPER: &str = "0X";
