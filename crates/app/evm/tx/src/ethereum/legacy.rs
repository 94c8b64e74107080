//! Legacy (pre-EIP-2718) transaction type.

use alloy_consensus::{Signed, TxLegacy};
use alloy_primitives::{keccak256, Address, PrimitiveSignature, B256, U256};

use crate::envelope::tx_type;
use crate::error::TxError;
use crate::ethereum::recovery::recover_sender_from_signature_hash;
use crate::traits::TypedTransaction;

/// A signed legacy Ethereum transaction with cached sender.
///
/// Legacy transactions carry no type prefix. Replay protection (EIP-155) is
/// present when the chain id is set, in which case it is folded into `v`.
#[derive(Clone, Debug)]
pub struct SignedLegacyTx {
    inner: Signed<TxLegacy>,
    /// Recovered once from the signature.
    sender: Address,
    /// keccak256 of the RLP-encoded signed transaction.
    hash: B256,
}

impl SignedLegacyTx {
    /// Wrap a decoded transaction, hashing the exact bytes it was read from.
    pub fn from_alloy_with_bytes(
        signed: Signed<TxLegacy>,
        raw_bytes: &[u8],
    ) -> Result<Self, TxError> {
        let sender =
            recover_sender_from_signature_hash(signed.signature_hash(), signed.signature())?;
        let hash = keccak256(raw_bytes);

        Ok(Self {
            inner: signed,
            sender,
            hash,
        })
    }

    /// Wrap a freshly signed transaction, recovering the sender.
    pub fn from_alloy(signed: Signed<TxLegacy>) -> Result<Self, TxError> {
        let sender =
            recover_sender_from_signature_hash(signed.signature_hash(), signed.signature())?;
        let hash = *signed.hash();

        Ok(Self {
            inner: signed,
            sender,
            hash,
        })
    }

    pub fn tx(&self) -> &TxLegacy {
        self.inner.tx()
    }

    pub fn signature(&self) -> &PrimitiveSignature {
        self.inner.signature()
    }

    /// Digest the signature was produced over.
    pub fn signature_hash(&self) -> B256 {
        self.inner.signature_hash()
    }

    pub fn gas_price(&self) -> u128 {
        self.tx().gas_price
    }

    /// Encode the signed transaction to RLP bytes.
    pub fn rlp_encode(&self, out: &mut Vec<u8>) {
        self.inner.rlp_encode(out);
    }
}

impl TypedTransaction for SignedLegacyTx {
    fn tx_type(&self) -> u8 {
        tx_type::LEGACY
    }

    fn sender(&self) -> Address {
        self.sender
    }

    fn tx_hash(&self) -> B256 {
        self.hash
    }

    fn gas_limit(&self) -> u64 {
        self.tx().gas_limit
    }

    fn chain_id(&self) -> Option<u64> {
        self.tx().chain_id
    }

    fn nonce(&self) -> u64 {
        self.tx().nonce
    }

    fn to(&self) -> Option<Address> {
        self.tx().to.to().copied()
    }

    fn value(&self) -> U256 {
        self.tx().value
    }

    fn input(&self) -> &[u8] {
        &self.tx().input
    }
}
