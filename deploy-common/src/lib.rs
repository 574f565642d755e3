//! Common modules used throughout the deploy tooling: address canonicalization,
//! nonce handling, and deterministic contract address derivation

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![no_std]

extern crate alloc;

pub mod address;
pub mod constants;
pub mod errors;
pub mod rlp;
pub mod types;
