//! Conversion of signed transactions into chain-native execution messages.

use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, Bytes, U256};
use evolve_evm_params::ChainConfig;

use crate::envelope::SignedTransaction;
use crate::error::TxError;
use crate::ethereum::recover_sender_from_signature_hash;
use crate::scheme::SigningScheme;
use crate::signer::Signer;
use crate::traits::TypedTransaction;

/// Execution message derived from a signed transaction.
///
/// Owns all of its data; nothing is shared with the source transaction.
/// Admission under `allow_unprotected_txs`, `enable_create` and `enable_call`
/// is left to the host executor; conversion does not consult them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeMessage {
    pub from: Address,
    pub to: Option<Address>,
    pub nonce: u64,
    pub value: U256,
    pub gas_limit: u64,
    /// Effective price per gas unit paid by the sender.
    pub gas_price: u128,
    pub gas_fee_cap: u128,
    pub gas_tip_cap: u128,
    pub data: Bytes,
    pub access_list: AccessList,
}

/// Re-sign through a different signer and attribute the message to it.
///
/// Test and benchmark tooling only: lets a harness execute a transaction
/// as an account other than the one that signed it.
#[derive(Clone, Copy)]
pub struct SenderOverride<'a> {
    pub address: Address,
    pub signer: &'a dyn Signer,
}

impl std::fmt::Debug for SenderOverride<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderOverride")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Price per gas paid by a fee market transaction:
/// `min(fee_cap, base_fee + tip_cap)`.
pub fn effective_gas_price(gas_fee_cap: u128, gas_tip_cap: u128, base_fee: u128) -> u128 {
    gas_fee_cap.min(base_fee.saturating_add(gas_tip_cap))
}

/// Converts signed transactions into native messages under the fork rules
/// of a chain.
///
/// Only the chain configuration is read. The parameter flags gating
/// unprotected transactions, contract creation and calls are enforced by the
/// host, not here.
#[derive(Debug, Clone)]
pub struct MessageConverter<'a> {
    chain_config: &'a ChainConfig,
    chain_id: u64,
}

impl<'a> MessageConverter<'a> {
    pub fn new(chain_config: &'a ChainConfig, chain_id: u64) -> Self {
        Self {
            chain_config,
            chain_id,
        }
    }

    /// Signing scheme in force at `height`.
    pub fn scheme_at(&self, height: u64) -> SigningScheme {
        SigningScheme::at_height(self.chain_config, self.chain_id, height)
    }

    /// Convert `tx` for execution at `height`.
    ///
    /// Dynamic fee transactions at or after London require `base_fee`;
    /// other variants ignore it.
    pub fn to_message(
        &self,
        tx: &SignedTransaction,
        height: u64,
        base_fee: Option<u128>,
        sender_override: Option<SenderOverride<'_>>,
    ) -> Result<NativeMessage, TxError> {
        let scheme = self.scheme_at(height);

        let from = match sender_override {
            Some(over) => {
                scheme.ensure_accepts(tx.tx_type())?;
                scheme.check_chain_id(tx.tx_type(), tx.chain_id())?;
                resign_as(tx, over)?
            }
            None => scheme.sender(tx)?,
        };

        let (gas_price, gas_fee_cap, gas_tip_cap) = match tx {
            SignedTransaction::Legacy(inner) => {
                let price = inner.gas_price();
                (price, price, price)
            }
            SignedTransaction::AccessList(inner) => {
                let price = inner.gas_price();
                (price, price, price)
            }
            SignedTransaction::DynamicFee(inner) => {
                let fee_cap = inner.max_fee_per_gas();
                let tip_cap = inner.max_priority_fee_per_gas();
                let price = if self.chain_config.is_london(height) {
                    let base_fee = base_fee.ok_or(TxError::MissingBaseFee { height })?;
                    effective_gas_price(fee_cap, tip_cap, base_fee)
                } else {
                    fee_cap
                };
                (price, fee_cap, tip_cap)
            }
        };

        tracing::debug!(
            height,
            scheme = scheme.name(),
            %from,
            gas_price,
            overridden = sender_override.is_some(),
            "converted transaction to native message"
        );

        Ok(NativeMessage {
            from,
            to: tx.to(),
            nonce: tx.nonce(),
            value: tx.value(),
            gas_limit: tx.gas_limit(),
            gas_price,
            gas_fee_cap,
            gas_tip_cap,
            data: Bytes::copy_from_slice(tx.input()),
            access_list: tx.access_list(),
        })
    }
}

fn resign_as(tx: &SignedTransaction, over: SenderOverride<'_>) -> Result<Address, TxError> {
    let digest = tx.signature_hash();
    let (signature, _) = over.signer.sign_by_address(over.address, digest)?;
    let recovered = recover_sender_from_signature_hash(digest, &signature)?;
    if recovered != over.address {
        return Err(TxError::InvalidSignature(format!(
            "override signature recovers to {recovered}, not {}",
            over.address
        )));
    }
    Ok(recovered)
}
