//! Accessor trait shared by every signed transaction type.

use alloy_primitives::{Address, B256, U256};

/// Read-only view of a signed transaction.
///
/// Signed transactions are immutable; changing any field means rebuilding
/// and re-signing.
pub trait TypedTransaction: Send + Sync {
    /// Returns the EIP-2718 transaction type byte.
    fn tx_type(&self) -> u8;

    /// Returns the sender address, recovered from the signature.
    fn sender(&self) -> Address;

    fn tx_hash(&self) -> B256;

    fn gas_limit(&self) -> u64;

    /// Returns the chain ID for replay protection (EIP-155).
    ///
    /// Returns `None` for legacy transactions without EIP-155.
    fn chain_id(&self) -> Option<u64>;

    fn nonce(&self) -> u64;

    /// Returns the recipient address, or `None` for contract creation.
    fn to(&self) -> Option<Address>;

    /// Returns the value (in wei) being transferred.
    fn value(&self) -> U256;

    fn input(&self) -> &[u8];
}
