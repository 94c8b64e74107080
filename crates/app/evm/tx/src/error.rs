//! Transaction pipeline error types.

use alloy_primitives::Address;
use thiserror::Error;

/// Errors raised while building, signing, decoding or converting transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// The transaction type is unknown, or not accepted by the signing scheme
    /// in force at the requested height.
    #[error("unsupported transaction type {tx_type:#04x}: {reason}")]
    UnsupportedVariant { tx_type: u8, reason: &'static str },

    /// The signer could not produce a signature for `address`.
    #[error("failed to sign with {address}: {reason}")]
    Signing { address: Address, reason: String },

    /// The signature is malformed, does not recover, or is bound to the
    /// wrong chain.
    #[error("invalid transaction signature: {0}")]
    InvalidSignature(String),

    /// A fee market transaction was converted after London without a base fee.
    #[error("base fee required for dynamic fee transaction at height {height}")]
    MissingBaseFee { height: u64 },

    /// Raw bytes are not a well-formed transaction.
    #[error("failed to decode transaction: {0}")]
    Decode(String),
}
