//! Signed transaction envelope supporting EIP-2718 typed transactions.

use alloy_consensus::{Signed, TxEip1559, TxEip2930, TxLegacy};
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, PrimitiveSignature, B256, U256};

use crate::error::TxError;
use crate::ethereum::{SignedEip1559Tx, SignedEip2930Tx, SignedLegacyTx};
use crate::traits::TypedTransaction;

/// Transaction type constants per EIP-2718.
pub mod tx_type {
    /// Legacy transaction (pre-EIP-2718).
    pub const LEGACY: u8 = 0x00;
    /// EIP-2930 access list transaction.
    pub const EIP2930: u8 = 0x01;
    /// EIP-1559 fee market transaction.
    pub const EIP1559: u8 = 0x02;
}

/// A signed transaction of any supported variant.
#[derive(Clone, Debug)]
pub enum SignedTransaction {
    /// Legacy transaction (untyped).
    Legacy(SignedLegacyTx),
    /// EIP-2930 access list transaction (type 0x01).
    AccessList(SignedEip2930Tx),
    /// EIP-1559 fee market transaction (type 0x02).
    DynamicFee(SignedEip1559Tx),
}

impl SignedTransaction {
    /// Encode the transaction to its network form.
    ///
    /// Returns the same format that `decode` accepts:
    /// - Legacy: RLP-encoded signed transaction
    /// - Typed: type byte followed by the RLP-encoded signed transaction
    pub fn encode(&self) -> Vec<u8> {
        match self {
            SignedTransaction::Legacy(tx) => {
                let mut buf = Vec::new();
                tx.rlp_encode(&mut buf);
                buf
            }
            SignedTransaction::AccessList(tx) => {
                let mut buf = vec![tx_type::EIP2930];
                tx.rlp_encode(&mut buf);
                buf
            }
            SignedTransaction::DynamicFee(tx) => {
                let mut buf = vec![tx_type::EIP1559];
                tx.rlp_encode(&mut buf);
                buf
            }
        }
    }

    /// Decode a transaction, rejecting trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, TxError> {
        let mut input = bytes;
        let tx = Self::decode_from(&mut input)?;
        if !input.is_empty() {
            return Err(TxError::Decode(format!(
                "{} trailing bytes after transaction",
                input.len()
            )));
        }
        Ok(tx)
    }

    /// Decode a transaction from the front of a byte slice, advancing it.
    ///
    /// # Transaction Format
    ///
    /// - Legacy: RLP list starting with 0xc0-0xff
    /// - Typed: Type byte (0x01, 0x02) followed by RLP payload
    pub fn decode_from(bytes: &mut &[u8]) -> Result<Self, TxError> {
        let input = *bytes;
        let Some((&first_byte, payload)) = input.split_first() else {
            return Err(TxError::Decode("empty transaction input".to_string()));
        };

        if first_byte >= 0xc0 {
            let mut cursor = input;
            let signed = Signed::<TxLegacy>::rlp_decode(&mut cursor)
                .map_err(|e| TxError::Decode(e.to_string()))?;

            let consumed = input.len().saturating_sub(cursor.len());
            let raw_bytes = input.get(..consumed).unwrap_or_default();
            let tx = SignedLegacyTx::from_alloy_with_bytes(signed, raw_bytes)?;
            *bytes = cursor;
            return Ok(SignedTransaction::Legacy(tx));
        }

        let mut cursor = payload;
        let tx = match first_byte {
            tx_type::EIP2930 => {
                let signed = Signed::<TxEip2930>::rlp_decode(&mut cursor)
                    .map_err(|e| TxError::Decode(e.to_string()))?;
                let consumed = payload.len().saturating_sub(cursor.len());
                let raw_rlp = payload.get(..consumed).unwrap_or_default();
                SignedTransaction::AccessList(SignedEip2930Tx::from_alloy_with_bytes(
                    signed, raw_rlp,
                )?)
            }
            tx_type::EIP1559 => {
                let signed = Signed::<TxEip1559>::rlp_decode(&mut cursor)
                    .map_err(|e| TxError::Decode(e.to_string()))?;
                let consumed = payload.len().saturating_sub(cursor.len());
                let raw_rlp = payload.get(..consumed).unwrap_or_default();
                SignedTransaction::DynamicFee(SignedEip1559Tx::from_alloy_with_bytes(
                    signed, raw_rlp,
                )?)
            }
            tx_type::LEGACY => {
                return Err(TxError::UnsupportedVariant {
                    tx_type: tx_type::LEGACY,
                    reason: "legacy transactions are not type-prefixed",
                })
            }
            ty => {
                return Err(TxError::UnsupportedVariant {
                    tx_type: ty,
                    reason: "unknown transaction type",
                })
            }
        };
        *bytes = cursor;
        Ok(tx)
    }

    /// Returns the transaction type byte.
    pub fn tx_type(&self) -> u8 {
        match self {
            SignedTransaction::Legacy(_) => tx_type::LEGACY,
            SignedTransaction::AccessList(_) => tx_type::EIP2930,
            SignedTransaction::DynamicFee(_) => tx_type::EIP1559,
        }
    }

    /// Digest the embedded signature was produced over.
    pub fn signature_hash(&self) -> B256 {
        match self {
            SignedTransaction::Legacy(tx) => tx.signature_hash(),
            SignedTransaction::AccessList(tx) => tx.signature_hash(),
            SignedTransaction::DynamicFee(tx) => tx.signature_hash(),
        }
    }

    pub fn signature(&self) -> &PrimitiveSignature {
        match self {
            SignedTransaction::Legacy(tx) => tx.signature(),
            SignedTransaction::AccessList(tx) => tx.signature(),
            SignedTransaction::DynamicFee(tx) => tx.signature(),
        }
    }

    /// Access list, empty for legacy transactions.
    pub fn access_list(&self) -> AccessList {
        match self {
            SignedTransaction::Legacy(_) => AccessList::default(),
            SignedTransaction::AccessList(tx) => tx.access_list().clone(),
            SignedTransaction::DynamicFee(tx) => tx.access_list().clone(),
        }
    }
}

impl From<SignedLegacyTx> for SignedTransaction {
    fn from(tx: SignedLegacyTx) -> Self {
        SignedTransaction::Legacy(tx)
    }
}

impl From<SignedEip2930Tx> for SignedTransaction {
    fn from(tx: SignedEip2930Tx) -> Self {
        SignedTransaction::AccessList(tx)
    }
}

impl From<SignedEip1559Tx> for SignedTransaction {
    fn from(tx: SignedEip1559Tx) -> Self {
        SignedTransaction::DynamicFee(tx)
    }
}

macro_rules! dispatch {
    ($self:ident, $tx:ident => $body:expr) => {
        match $self {
            SignedTransaction::Legacy($tx) => $body,
            SignedTransaction::AccessList($tx) => $body,
            SignedTransaction::DynamicFee($tx) => $body,
        }
    };
}

impl TypedTransaction for SignedTransaction {
    fn tx_type(&self) -> u8 {
        SignedTransaction::tx_type(self)
    }

    fn sender(&self) -> Address {
        dispatch!(self, tx => tx.sender())
    }

    fn tx_hash(&self) -> B256 {
        dispatch!(self, tx => tx.tx_hash())
    }

    fn gas_limit(&self) -> u64 {
        dispatch!(self, tx => tx.gas_limit())
    }

    fn chain_id(&self) -> Option<u64> {
        dispatch!(self, tx => tx.chain_id())
    }

    fn nonce(&self) -> u64 {
        dispatch!(self, tx => tx.nonce())
    }

    fn to(&self) -> Option<Address> {
        dispatch!(self, tx => tx.to())
    }

    fn value(&self) -> U256 {
        dispatch!(self, tx => tx.value())
    }

    fn input(&self) -> &[u8] {
        dispatch!(self, tx => tx.input())
    }
}
