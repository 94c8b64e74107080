//! V4 → V5 parameter migration.
//!
//! V5 drops the per-field key layout: the whole parameter set is stored as a
//! single value under [`PARAMS_KEY`], and the extra EIP wrapper is flattened
//! into a plain list. V4 validators are only consulted here, before the old
//! snapshot is converted.

use serde::{Deserialize, Serialize};

use crate::chain_config::ChainConfig;
use crate::denom::validate_denom;
use crate::eips::validate_eips;
use crate::error::{ParamError, ValidationError};
use crate::store::{get_param_set, ParamStore};
use crate::v4::{keys, V4Params};

/// Store key of the V5 parameter blob.
pub const PARAMS_KEY: &str = "Params";

/// Current EVM module parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    pub evm_denom: String,
    pub enable_create: bool,
    pub enable_call: bool,
    pub extra_eips: Vec<i64>,
    pub chain_config: ChainConfig,
    pub allow_unprotected_txs: bool,
}

impl Params {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_denom(&self.evm_denom)
            .map_err(|reason| ValidationError::new(keys::EVM_DENOM, reason))?;
        validate_eips(&self.extra_eips)
            .map_err(|reason| ValidationError::new(keys::EXTRA_EIPS, reason))?;
        self.chain_config
            .validate()
            .map_err(|e| ValidationError::new(keys::CHAIN_CONFIG, e.to_string()))
    }
}

impl Default for Params {
    fn default() -> Self {
        migrate_fields(V4Params::default())
    }
}

fn migrate_fields(old: V4Params) -> Params {
    Params {
        evm_denom: old.evm_denom,
        enable_create: old.enable_create,
        enable_call: old.enable_call,
        extra_eips: old.extra_eips.eips,
        chain_config: old.chain_config,
        allow_unprotected_txs: old.allow_unprotected_txs,
    }
}

/// Convert a V4 snapshot into its V5 successor.
///
/// The V4 snapshot must pass the V4 validators; an invalid snapshot is never
/// carried forward.
pub fn migrate_v4_to_v5(old: V4Params) -> Result<Params, ValidationError> {
    old.validate()?;
    let params = migrate_fields(old);
    params.validate()?;
    Ok(params)
}

/// Migrate a store holding the V4 per-key layout to the V5 single-blob layout.
pub fn migrate_store<S: ParamStore + ?Sized>(store: &mut S) -> Result<Params, ParamError> {
    let old = get_param_set(store)?;
    let params = migrate_v4_to_v5(old)?;

    let blob = serde_json::to_vec(&params).map_err(|source| ParamError::Encode {
        key: PARAMS_KEY.to_string(),
        source,
    })?;
    store.set(PARAMS_KEY.as_bytes(), blob);
    for key in keys::ALL {
        store.remove(key.as_bytes());
    }

    tracing::info!(
        denom = %params.evm_denom,
        extra_eips = ?params.extra_eips,
        "migrated evm params from v4 to v5"
    );
    Ok(params)
}

/// Read the V5 parameter blob.
pub fn read_params<S: ParamStore + ?Sized>(store: &S) -> Result<Params, ParamError> {
    let bytes = store
        .get(PARAMS_KEY.as_bytes())
        .ok_or_else(|| ParamError::Missing {
            key: PARAMS_KEY.to_string(),
        })?;
    let params: Params = serde_json::from_slice(&bytes).map_err(|source| ParamError::Decode {
        key: PARAMS_KEY.to_string(),
        source,
    })?;
    params.validate()?;
    Ok(params)
}
