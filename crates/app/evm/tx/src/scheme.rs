//! Fork-dependent signing schemes.
//!
//! Which transaction types are valid, and how signatures bind to a chain,
//! depends on the hard forks active at a height.

use alloy_primitives::Address;
use evolve_evm_params::ChainConfig;

use crate::envelope::{tx_type, SignedTransaction};
use crate::error::TxError;
use crate::ethereum::is_low_s;
use crate::traits::TypedTransaction;

/// Signature rules in force at a given height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// Unprotected legacy only; high `s` values tolerated.
    Frontier,
    /// Unprotected legacy only, low `s`.
    Homestead,
    /// Legacy, optionally replay-protected.
    Eip155 { chain_id: u64 },
    /// Adds EIP-2930 access list transactions.
    Berlin { chain_id: u64 },
    /// Adds EIP-1559 dynamic fee transactions.
    London { chain_id: u64 },
}

impl SigningScheme {
    /// Scheme of the latest fork active at `height`.
    pub fn at_height(config: &ChainConfig, chain_id: u64, height: u64) -> Self {
        if config.is_london(height) {
            SigningScheme::London { chain_id }
        } else if config.is_berlin(height) {
            SigningScheme::Berlin { chain_id }
        } else if config.is_eip155(height) {
            SigningScheme::Eip155 { chain_id }
        } else if config.is_homestead(height) {
            SigningScheme::Homestead
        } else {
            SigningScheme::Frontier
        }
    }

    /// Scheme accepting every supported variant.
    pub fn latest(chain_id: u64) -> Self {
        SigningScheme::London { chain_id }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::Frontier => "frontier",
            SigningScheme::Homestead => "homestead",
            SigningScheme::Eip155 { .. } => "eip155",
            SigningScheme::Berlin { .. } => "berlin",
            SigningScheme::London { .. } => "london",
        }
    }

    /// Chain id signatures are bound to, if the scheme is replay-protected.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            SigningScheme::Frontier | SigningScheme::Homestead => None,
            SigningScheme::Eip155 { chain_id }
            | SigningScheme::Berlin { chain_id }
            | SigningScheme::London { chain_id } => Some(*chain_id),
        }
    }

    pub fn accepts(&self, ty: u8) -> bool {
        match ty {
            tx_type::LEGACY => true,
            tx_type::EIP2930 => matches!(
                self,
                SigningScheme::Berlin { .. } | SigningScheme::London { .. }
            ),
            tx_type::EIP1559 => matches!(self, SigningScheme::London { .. }),
            _ => false,
        }
    }

    pub fn ensure_accepts(&self, ty: u8) -> Result<(), TxError> {
        if self.accepts(ty) {
            return Ok(());
        }
        let reason = match ty {
            tx_type::EIP2930 => "access list transactions require the berlin fork",
            tx_type::EIP1559 => "dynamic fee transactions require the london fork",
            _ => "unknown transaction type",
        };
        Err(TxError::UnsupportedVariant {
            tx_type: ty,
            reason,
        })
    }

    /// Check that a transaction's chain id binding is valid under this scheme.
    ///
    /// Unprotected legacy transactions are valid under every scheme.
    pub fn check_chain_id(&self, ty: u8, tx_chain_id: Option<u64>) -> Result<(), TxError> {
        match (tx_chain_id, self.chain_id()) {
            (None, _) if ty == tx_type::LEGACY => Ok(()),
            (None, _) => Err(TxError::InvalidSignature(
                "typed transaction without chain id".to_string(),
            )),
            (Some(_), None) => Err(TxError::InvalidSignature(format!(
                "replay-protected transaction under {} rules",
                self.name()
            ))),
            (Some(got), Some(expected)) if got != expected => Err(TxError::InvalidSignature(
                format!("chain id mismatch: have {got}, want {expected}"),
            )),
            (Some(_), Some(_)) => Ok(()),
        }
    }

    /// Frontier is the only scheme that tolerates malleable signatures.
    pub fn requires_low_s(&self) -> bool {
        !matches!(self, SigningScheme::Frontier)
    }

    /// Sender of `tx`, after checking it is valid under this scheme.
    pub fn sender(&self, tx: &SignedTransaction) -> Result<Address, TxError> {
        let ty = tx.tx_type();
        self.ensure_accepts(ty)?;
        self.check_chain_id(ty, tx.chain_id())?;
        if self.requires_low_s() && !is_low_s(tx.signature()) {
            return Err(TxError::InvalidSignature(
                "signature s value above half the curve order".to_string(),
            ));
        }
        Ok(tx.sender())
    }
}
