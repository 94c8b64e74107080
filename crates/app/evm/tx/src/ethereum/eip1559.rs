//! EIP-1559 fee market transaction type.

use alloy_consensus::{Signed, TxEip1559};
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, PrimitiveSignature, B256, U256};

use crate::envelope::tx_type;
use crate::error::TxError;
use crate::ethereum::recovery::recover_sender_from_signature_hash;
use crate::ethereum::typed_tx_hash;
use crate::traits::TypedTransaction;

/// A signed EIP-1559 transaction with cached sender.
///
/// EIP-1559 transactions include:
/// - Fee cap and priority fee (tip) instead of a flat gas price
/// - Access lists for gas optimization
/// - A mandatory chain ID
#[derive(Clone, Debug)]
pub struct SignedEip1559Tx {
    inner: Signed<TxEip1559>,
    sender: Address,
    hash: B256,
}

impl SignedEip1559Tx {
    /// Wrap a decoded transaction; `rlp_bytes` excludes the type prefix.
    pub fn from_alloy_with_bytes(
        signed: Signed<TxEip1559>,
        rlp_bytes: &[u8],
    ) -> Result<Self, TxError> {
        let sender =
            recover_sender_from_signature_hash(signed.signature_hash(), signed.signature())?;
        let hash = typed_tx_hash(tx_type::EIP1559, rlp_bytes);

        Ok(Self {
            inner: signed,
            sender,
            hash,
        })
    }

    pub fn from_alloy(signed: Signed<TxEip1559>) -> Result<Self, TxError> {
        let sender =
            recover_sender_from_signature_hash(signed.signature_hash(), signed.signature())?;
        let hash = *signed.hash();

        Ok(Self {
            inner: signed,
            sender,
            hash,
        })
    }

    pub fn tx(&self) -> &TxEip1559 {
        self.inner.tx()
    }

    pub fn signature(&self) -> &PrimitiveSignature {
        self.inner.signature()
    }

    pub fn signature_hash(&self) -> B256 {
        self.inner.signature_hash()
    }

    pub fn max_fee_per_gas(&self) -> u128 {
        self.tx().max_fee_per_gas
    }

    /// Max priority fee per gas (tip).
    pub fn max_priority_fee_per_gas(&self) -> u128 {
        self.tx().max_priority_fee_per_gas
    }

    pub fn access_list(&self) -> &AccessList {
        &self.tx().access_list
    }

    /// Encode the signed transaction to RLP bytes, without the type prefix.
    pub fn rlp_encode(&self, out: &mut Vec<u8>) {
        self.inner.rlp_encode(out);
    }
}

impl TypedTransaction for SignedEip1559Tx {
    fn tx_type(&self) -> u8 {
        tx_type::EIP1559
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
