//! EVM module parameters.
//!
//! Holds the V4 parameter set with its per-field validators, the embedded
//! chain configuration used as the hard fork gate, persistence over a
//! key-value store, and the migration to the V5 single-blob layout.

pub mod chain_config;
pub mod denom;
pub mod eips;
pub mod error;
pub mod loader;
pub mod migration;
pub mod store;
pub mod v4;
pub mod value;

pub use chain_config::{is_london, ChainConfig, DEFAULT_EIP150_HASH};
pub use eips::{is_activateable, validate_eips, ExtraEips, ACTIVATEABLE_EIPS};
pub use error::{ChainConfigError, ConfigError, ParamError, ValidationError};
pub use loader::{load_params, load_params_from_str};
pub use migration::{migrate_store, migrate_v4_to_v5, read_params, Params, PARAMS_KEY};
pub use store::{
    get_param_set, set_param_set, update_param, validate_raw, MemoryParamStore, ParamStore,
};
pub use v4::{keys, V4Params, DEFAULT_EVM_DENOM};
pub use value::{ParamSetPair, ParamSlot, ParamValue, Validator};
