//! EIP-2930 access list transaction type.

use alloy_consensus::{Signed, TxEip2930};
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, PrimitiveSignature, B256, U256};

use crate::envelope::tx_type;
use crate::error::TxError;
use crate::ethereum::recovery::recover_sender_from_signature_hash;
use crate::ethereum::typed_tx_hash;
use crate::traits::TypedTransaction;

/// A signed EIP-2930 transaction with cached sender.
///
/// Same pricing as legacy, plus an explicit chain id and an access list of
/// pre-warmed addresses and storage keys.
#[derive(Clone, Debug)]
pub struct SignedEip2930Tx {
    inner: Signed<TxEip2930>,
    sender: Address,
    /// keccak256 of the type prefix followed by the RLP payload.
    hash: B256,
}

impl SignedEip2930Tx {
    /// Wrap a decoded transaction; `rlp_bytes` excludes the type prefix.
    pub fn from_alloy_with_bytes(
        signed: Signed<TxEip2930>,
        rlp_bytes: &[u8],
    ) -> Result<Self, TxError> {
        let sender =
            recover_sender_from_signature_hash(signed.signature_hash(), signed.signature())?;
        let hash = typed_tx_hash(tx_type::EIP2930, rlp_bytes);

        Ok(Self {
            inner: signed,
            sender,
            hash,
        })
    }

    pub fn from_alloy(signed: Signed<TxEip2930>) -> Result<Self, TxError> {
        let sender =
            recover_sender_from_signature_hash(signed.signature_hash(), signed.signature())?;
        let hash = *signed.hash();

        Ok(Self {
            inner: signed,
            sender,
            hash,
        })
    }

    pub fn tx(&self) -> &TxEip2930 {
        self.inner.tx()
    }

    pub fn signature(&self) -> &PrimitiveSignature {
        self.inner.signature()
    }

    pub fn signature_hash(&self) -> B256 {
        self.inner.signature_hash()
    }

    pub fn gas_price(&self) -> u128 {
        self.tx().gas_price
    }

    pub fn access_list(&self) -> &AccessList {
        &self.tx().access_list
    }

    /// Encode the signed transaction to RLP bytes, without the type prefix.
    pub fn rlp_encode(&self, out: &mut Vec<u8>) {
        self.inner.rlp_encode(out);
    }
}

impl TypedTransaction for SignedEip2930Tx {
    fn tx_type(&self) -> u8 {
        tx_type::EIP2930
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
        Some(self.tx().chain_id)
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
