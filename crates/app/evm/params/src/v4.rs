//! Version 4 of the EVM module parameters.

use serde::{Deserialize, Serialize};

use crate::chain_config::ChainConfig;
use crate::eips::ExtraEips;
use crate::error::ValidationError;
use crate::value::{
    validate_bool, validate_chain_config, validate_evm_denom, validate_extra_eips, ParamSetPair,
    ParamSlot, ParamValue, Validator,
};

/// Default EVM denomination.
pub const DEFAULT_EVM_DENOM: &str = "aphoton";
/// Unprotected (pre EIP-155) transactions are rejected by default.
pub const DEFAULT_ALLOW_UNPROTECTED_TXS: bool = false;
pub const DEFAULT_ENABLE_CREATE: bool = true;
pub const DEFAULT_ENABLE_CALL: bool = true;

/// Parameter store keys, in validation order.
pub mod keys {
    pub const EVM_DENOM: &str = "EVMDenom";
    pub const ENABLE_CREATE: &str = "EnableCreate";
    pub const ENABLE_CALL: &str = "EnableCall";
    pub const EXTRA_EIPS: &str = "EnableExtraEIPs";
    pub const CHAIN_CONFIG: &str = "ChainConfig";
    pub const ALLOW_UNPROTECTED_TXS: &str = "AllowUnprotectedTxs";

    pub const ALL: [&str; 6] = [
        EVM_DENOM,
        ENABLE_CREATE,
        ENABLE_CALL,
        EXTRA_EIPS,
        CHAIN_CONFIG,
        ALLOW_UNPROTECTED_TXS,
    ];
}

/// Validated EVM module parameters, V4 layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct V4Params {
    /// Token denomination used for EVM state transitions and gas.
    pub evm_denom: String,
    /// Whether contract creation is enabled.
    pub enable_create: bool,
    /// Whether contract calls are enabled.
    pub enable_call: bool,
    /// Extra EIPs activated on top of the fork instruction set.
    pub extra_eips: ExtraEips,
    pub chain_config: ChainConfig,
    /// Whether replay-unprotected legacy transactions are accepted.
    pub allow_unprotected_txs: bool,
}

impl Default for V4Params {
    /// No extra EIPs, so the latest fork instruction set is never overridden.
    fn default() -> Self {
        Self {
            evm_denom: DEFAULT_EVM_DENOM.to_string(),
            enable_create: DEFAULT_ENABLE_CREATE,
            enable_call: DEFAULT_ENABLE_CALL,
            extra_eips: ExtraEips::default(),
            chain_config: ChainConfig::default(),
            allow_unprotected_txs: DEFAULT_ALLOW_UNPROTECTED_TXS,
        }
    }
}

impl V4Params {
    /// Build a parameter set, rejecting it if any field is invalid.
    pub fn new(
        evm_denom: impl Into<String>,
        allow_unprotected_txs: bool,
        enable_create: bool,
        enable_call: bool,
        chain_config: ChainConfig,
        extra_eips: ExtraEips,
    ) -> Result<Self, ValidationError> {
        let params = Self {
            evm_denom: evm_denom.into(),
            enable_create,
            enable_call,
            extra_eips,
            chain_config,
            allow_unprotected_txs,
        };
        params.validate()?;
        Ok(params)
    }

    /// Each field with its key and validator, in declared order.
    fn entries(&self) -> [(&'static str, ParamValue, Validator); 6] {
        [
            (
                keys::EVM_DENOM,
                ParamValue::Str(self.evm_denom.clone()),
                validate_evm_denom,
            ),
            (
                keys::ENABLE_CREATE,
                ParamValue::Bool(self.enable_create),
                validate_bool,
            ),
            (
                keys::ENABLE_CALL,
                ParamValue::Bool(self.enable_call),
                validate_bool,
            ),
            (
                keys::EXTRA_EIPS,
                ParamValue::Eips(self.extra_eips.clone()),
                validate_extra_eips,
            ),
            (
                keys::CHAIN_CONFIG,
                ParamValue::ChainConfig(self.chain_config.clone()),
                validate_chain_config,
            ),
            (
                keys::ALLOW_UNPROTECTED_TXS,
                ParamValue::Bool(self.allow_unprotected_txs),
                validate_bool,
            ),
        ]
    }

    /// Run every field validator and return the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (key, value, validator) in self.entries() {
            validator(&value).map_err(|reason| ValidationError::new(key, reason))?;
        }
        Ok(())
    }

    /// Expose each field as an independently validated store slot.
    pub fn param_set_pairs(&mut self) -> Vec<ParamSetPair<'_>> {
        vec![
            ParamSetPair::new(
                keys::EVM_DENOM,
                ParamSlot::Str(&mut self.evm_denom),
                validate_evm_denom,
            ),
            ParamSetPair::new(
                keys::ENABLE_CREATE,
                ParamSlot::Bool(&mut self.enable_create),
                validate_bool,
            ),
            ParamSetPair::new(
                keys::ENABLE_CALL,
                ParamSlot::Bool(&mut self.enable_call),
                validate_bool,
            ),
            ParamSetPair::new(
                keys::EXTRA_EIPS,
                ParamSlot::Eips(&mut self.extra_eips),
                validate_extra_eips,
            ),
            ParamSetPair::new(
                keys::CHAIN_CONFIG,
                ParamSlot::ChainConfig(&mut self.chain_config),
                validate_chain_config,
            ),
            ParamSetPair::new(
                keys::ALLOW_UNPROTECTED_TXS,
                ParamSlot::Bool(&mut self.allow_unprotected_txs),
                validate_bool,
            ),
        ]
    }

    /// Extra EIPs as plain integers.
    pub fn eips(&self) -> Vec<i64> {
        self.extra_eips.eips.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        let params = V4Params::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.evm_denom, "aphoton");
        assert!(params.enable_create);
        assert!(params.enable_call);
        assert!(!params.allow_unprotected_txs);
        assert!(params.eips().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_denom() {
        let err = V4Params::new(
            "",
            false,
            true,
            true,
            ChainConfig::default(),
            ExtraEips::default(),
        )
        .unwrap_err();
        assert_eq!(err.key, keys::EVM_DENOM);
    }

    #[test]
    fn test_denom_checked_before_everything_else() {
        let params = V4Params {
            evm_denom: "bad denom".into(),
            extra_eips: ExtraEips::new([9999]),
            chain_config: ChainConfig {
                eip150_hash: "nope".into(),
                ..ChainConfig::default()
            },
            ..V4Params::default()
        };
        assert_eq!(params.validate().unwrap_err().key, keys::EVM_DENOM);
    }

    #[test]
    fn test_eips_checked_before_chain_config() {
        let params = V4Params {
            extra_eips: ExtraEips::new([1344, 9999]),
            chain_config: ChainConfig {
                berlin_block: None,
                ..ChainConfig::default()
            },
            ..V4Params::default()
        };
        let err = params.validate().unwrap_err();
        assert_eq!(err.key, keys::EXTRA_EIPS);
        assert!(err.reason.contains("9999"));
    }

    #[test]
    fn test_invalid_chain_config_reported() {
        let params = V4Params {
            chain_config: ChainConfig {
                london_block: None,
                ..ChainConfig::default()
            },
            ..V4Params::default()
        };
        assert_eq!(params.validate().unwrap_err().key, keys::CHAIN_CONFIG);
    }

    #[test]
    fn test_pairs_follow_key_order() {
        let mut params = V4Params::default();
        let pair_keys: Vec<_> = params.param_set_pairs().iter().map(|p| p.key).collect();
        assert_eq!(pair_keys, keys::ALL);
    }

    #[test]
    fn test_pair_rejects_wrong_type_for_bool() {
        let mut params = V4Params::default();
        let mut pairs = params.param_set_pairs();
        let unprotected = pairs
            .iter_mut()
            .find(|p| p.key == keys::ALLOW_UNPROTECTED_TXS)
            .unwrap();
        let err = unprotected.set(ParamValue::Str("true".into())).unwrap_err();
        assert_eq!(err.key, keys::ALLOW_UNPROTECTED_TXS);
        drop(pairs);
        assert!(!params.allow_unprotected_txs);
    }
}
