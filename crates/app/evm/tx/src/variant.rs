//! Unsigned transaction shapes and their reference templates.

use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, Bytes, U256};

use crate::envelope::tx_type;
use crate::error::TxError;

/// Gas limit of a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;
pub const TEMPLATE_GAS_PRICE: u128 = 1;
pub const TEMPLATE_GAS_FEE_CAP: u128 = 10;
pub const TEMPLATE_GAS_TIP_CAP: u128 = 2;

/// The transaction shapes this pipeline can build.
///
/// `to == None` means contract creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxVariant {
    Legacy {
        nonce: u64,
        gas_price: u128,
        gas_limit: u64,
        to: Option<Address>,
        value: U256,
        data: Bytes,
    },
    AccessList {
        nonce: u64,
        gas_price: u128,
        gas_limit: u64,
        to: Option<Address>,
        value: U256,
        data: Bytes,
        access_list: AccessList,
    },
    DynamicFee {
        nonce: u64,
        gas_fee_cap: u128,
        gas_tip_cap: u128,
        gas_limit: u64,
        to: Option<Address>,
        value: U256,
        data: Bytes,
        access_list: AccessList,
    },
}

impl TxVariant {
    /// Value transfer of zero to the zero address at gas price 1.
    pub fn legacy_template(nonce: u64) -> Self {
        TxVariant::Legacy {
            nonce,
            gas_price: TEMPLATE_GAS_PRICE,
            gas_limit: TRANSFER_GAS,
            to: Some(Address::ZERO),
            value: U256::ZERO,
            data: Bytes::new(),
        }
    }

    pub fn access_list_template(nonce: u64) -> Self {
        TxVariant::AccessList {
            nonce,
            gas_price: TEMPLATE_GAS_PRICE,
            gas_limit: TRANSFER_GAS,
            to: Some(Address::ZERO),
            value: U256::ZERO,
            data: Bytes::new(),
            access_list: AccessList::default(),
        }
    }

    pub fn dynamic_fee_template(nonce: u64) -> Self {
        TxVariant::DynamicFee {
            nonce,
            gas_fee_cap: TEMPLATE_GAS_FEE_CAP,
            gas_tip_cap: TEMPLATE_GAS_TIP_CAP,
            gas_limit: TRANSFER_GAS,
            to: Some(Address::ZERO),
            value: U256::ZERO,
            data: Bytes::new(),
            access_list: AccessList::default(),
        }
    }

    /// Template for an EIP-2718 type byte.
    pub fn template(ty: u8, nonce: u64) -> Result<Self, TxError> {
        match ty {
            tx_type::LEGACY => Ok(Self::legacy_template(nonce)),
            tx_type::EIP2930 => Ok(Self::access_list_template(nonce)),
            tx_type::EIP1559 => Ok(Self::dynamic_fee_template(nonce)),
            other => Err(TxError::UnsupportedVariant {
                tx_type: other,
                reason: "no template for transaction type",
            }),
        }
    }

    pub fn tx_type(&self) -> u8 {
        match self {
            TxVariant::Legacy { .. } => tx_type::LEGACY,
            TxVariant::AccessList { .. } => tx_type::EIP2930,
            TxVariant::DynamicFee { .. } => tx_type::EIP1559,
        }
    }

    pub fn nonce(&self) -> u64 {
        match self {
            TxVariant::Legacy { nonce, .. }
            | TxVariant::AccessList { nonce, .. }
            | TxVariant::DynamicFee { nonce, .. } => *nonce,
        }
    }

    /// Same transaction with only the nonce replaced.
    pub fn with_nonce(mut self, new_nonce: u64) -> Self {
        match &mut self {
            TxVariant::Legacy { nonce, .. }
            | TxVariant::AccessList { nonce, .. }
            | TxVariant::DynamicFee { nonce, .. } => *nonce = new_nonce,
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_report_type() {
        assert_eq!(TxVariant::legacy_template(0).tx_type(), tx_type::LEGACY);
        assert_eq!(TxVariant::access_list_template(0).tx_type(), tx_type::EIP2930);
        assert_eq!(TxVariant::dynamic_fee_template(0).tx_type(), tx_type::EIP1559);
    }

    #[test]
    fn test_template_by_type_byte() {
        for ty in [tx_type::LEGACY, tx_type::EIP2930, tx_type::EIP1559] {
            let variant = TxVariant::template(ty, 7).unwrap();
            assert_eq!(variant.tx_type(), ty);
            assert_eq!(variant.nonce(), 7);
        }
        assert_eq!(
            TxVariant::template(0x03, 0).unwrap_err(),
            TxError::UnsupportedVariant {
                tx_type: 0x03,
                reason: "no template for transaction type",
            }
        );
    }

    #[test]
    fn test_templates_are_fresh_values() {
        let first = TxVariant::dynamic_fee_template(1);
        let second = TxVariant::dynamic_fee_template(1);
        assert_eq!(first, second);
        assert!(matches!(
            first,
            TxVariant::DynamicFee {
                gas_fee_cap: 10,
                gas_tip_cap: 2,
                gas_limit: 21_000,
                to: Some(to),
                ..
            } if to == Address::ZERO
        ));
    }

    #[test]
    fn test_with_nonce_changes_only_nonce() {
        let base = TxVariant::access_list_template(0);
        let bumped = base.clone().with_nonce(42);
        assert_eq!(bumped.nonce(), 42);
        assert_eq!(bumped.with_nonce(0), base);
    }
}
