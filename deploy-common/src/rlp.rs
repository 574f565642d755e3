//! Recursive length-prefix (RLP) encoding of the contract creation preimage

use alloc::vec::Vec;

use alloy_primitives::Address;
use alloy_rlp::{length_of_length, Encodable, Header};

use crate::types::Nonce;

/// RLP-encode a flat list of byte strings.
///
/// Each item is length-prefixed as a byte string, and the list header is
/// length-prefixed around the concatenation of the encoded items.
pub fn encode_bytes_list(items: &[&[u8]]) -> Vec<u8> {
    let payload_length: usize = items.iter().map(|item| Encodable::length(*item)).sum();

    let mut out = Vec::with_capacity(length_of_length(payload_length) + payload_length);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    for item in items {
        Encodable::encode(*item, &mut out);
    }

    out
}

/// The bytes hashed by the ledger to assign an address to a contract created by
/// `sender` at `nonce`, namely `rlp([sender, trimmed_be(nonce)])`
pub fn creation_preimage(sender: &Address, nonce: Nonce) -> Vec<u8> {
    let nonce_bytes = nonce.to_be_bytes_trimmed();
    encode_bytes_list(&[sender.as_slice(), &nonce_bytes])
}
