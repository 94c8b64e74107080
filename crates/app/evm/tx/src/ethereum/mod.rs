//! Ethereum standard transaction types.
//!
//! Wrappers around alloy's signed transaction types that recover the sender
//! once and cache the transaction hash.

mod eip1559;
mod eip2930;
mod legacy;
pub(crate) mod recovery;

pub use eip1559::SignedEip1559Tx;
pub use eip2930::SignedEip2930Tx;
pub use legacy::SignedLegacyTx;
pub use recovery::{is_low_s, recover_sender_from_signature_hash, SECP256K1N_HALF};

use alloy_primitives::{keccak256, B256};

/// EIP-2718 typed transaction hash: keccak256(type || rlp).
pub(crate) fn typed_tx_hash(ty: u8, rlp_bytes: &[u8]) -> B256 {
    let mut hash_input = Vec::with_capacity(1 + rlp_bytes.len());
    hash_input.push(ty);
    hash_input.extend_from_slice(rlp_bytes);
    keccak256(&hash_input)
}
