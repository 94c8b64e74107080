//! Parameter persistence over a byte-oriented key-value store.
//!
//! Each V4 field lives under its own key as a JSON value. Writes validate the
//! complete snapshot before touching the store, and reads re-run every slot
//! validator on the raw value before it is adopted.

use std::collections::BTreeMap;

use crate::error::ParamError;
use crate::v4::V4Params;
use crate::value::ParamValue;

/// Byte-oriented key-value store owned by the host chain.
pub trait ParamStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn set(&mut self, key: &[u8], value: Vec<u8>);
    fn remove(&mut self, key: &[u8]);
}

/// In-memory store, used for genesis tooling and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryParamStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ParamStore for MemoryParamStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.data.insert(key.to_vec(), value);
    }

    fn remove(&mut self, key: &[u8]) {
        self.data.remove(key);
    }
}

fn encode_value(key: &str, value: &ParamValue) -> Result<Vec<u8>, ParamError> {
    serde_json::to_vec(value).map_err(|source| ParamError::Encode {
        key: key.to_string(),
        source,
    })
}

fn decode_value(key: &str, bytes: &[u8]) -> Result<ParamValue, ParamError> {
    serde_json::from_slice(bytes).map_err(|source| ParamError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Persist a full parameter snapshot.
///
/// Nothing is written unless the whole snapshot validates.
pub fn set_param_set<S: ParamStore + ?Sized>(
    store: &mut S,
    params: &V4Params,
) -> Result<(), ParamError> {
    params.validate()?;

    let mut snapshot = params.clone();
    let encoded = snapshot
        .param_set_pairs()
        .iter()
        .map(|pair| Ok((pair.key, encode_value(pair.key, &pair.value())?)))
        .collect::<Result<Vec<_>, ParamError>>()?;

    for (key, bytes) in encoded {
        store.set(key.as_bytes(), bytes);
    }
    tracing::debug!(denom = %params.evm_denom, "stored evm params");
    Ok(())
}

/// Load a parameter snapshot, validating every raw value on the way in.
pub fn get_param_set<S: ParamStore + ?Sized>(store: &S) -> Result<V4Params, ParamError> {
    let mut params = V4Params::default();
    for mut pair in params.param_set_pairs() {
        let bytes = store.get(pair.key.as_bytes()).ok_or_else(|| ParamError::Missing {
            key: pair.key.to_string(),
        })?;
        pair.set(decode_value(pair.key, &bytes)?)?;
    }
    params.validate()?;
    Ok(params)
}

/// Apply a governance parameter change to a single key.
///
/// The raw value is validated on its own, applied to a copy of the current
/// snapshot, and the copy is validated as a whole. The store is only written
/// when both checks pass. Returns the new snapshot.
pub fn update_param<S: ParamStore + ?Sized>(
    store: &mut S,
    key: &str,
    raw: &[u8],
) -> Result<V4Params, ParamError> {
    let mut next = get_param_set(store)?;

    let (static_key, value) = {
        let mut pairs = next.param_set_pairs();
        let pair = pairs
            .iter_mut()
            .find(|pair| pair.key == key)
            .ok_or_else(|| ParamError::UnknownKey(key.to_string()))?;
        let value = decode_value(pair.key, raw)?;
        pair.set(value.clone())?;
        (pair.key, value)
    };

    if let Err(err) = next.validate() {
        tracing::warn!(key = static_key, error = %err, "rejected evm param change");
        return Err(err.into());
    }

    store.set(static_key.as_bytes(), encode_value(static_key, &value)?);
    tracing::debug!(key = static_key, "updated evm param");
    Ok(next)
}

/// Validate a raw value for `key` without touching any store.
pub fn validate_raw(key: &str, raw: &[u8]) -> Result<(), ParamError> {
    let mut scratch = V4Params::default();
    let pairs = scratch.param_set_pairs();
    let pair = pairs
        .iter()
        .find(|pair| pair.key == key)
        .ok_or_else(|| ParamError::UnknownKey(key.to_string()))?;
    let value = decode_value(pair.key, raw)?;
    pair.validate(&value).map_err(ParamError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::v4::keys;

    #[test]
    fn test_roundtrip_through_store() {
        let mut store = MemoryParamStore::new();
        let params = V4Params {
            allow_unprotected_txs: true,
            ..V4Params::default()
        };
        set_param_set(&mut store, &params).unwrap();
        assert_eq!(store.len(), keys::ALL.len());
        assert_eq!(get_param_set(&store).unwrap(), params);
    }

    #[test]
    fn test_invalid_snapshot_not_written() {
        let mut store = MemoryParamStore::new();
        let params = V4Params {
            evm_denom: String::new(),
            ..V4Params::default()
        };
        let err = set_param_set(&mut store, &params).unwrap_err();
        assert!(matches!(
            err,
            ParamError::Validation(ValidationError {
                key: keys::EVM_DENOM,
                ..
            })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_key_reported() {
        let mut store = MemoryParamStore::new();
        set_param_set(&mut store, &V4Params::default()).unwrap();
        store.remove(keys::CHAIN_CONFIG.as_bytes());
        assert!(matches!(
            get_param_set(&store),
            Err(ParamError::Missing { key }) if key == keys::CHAIN_CONFIG
        ));
    }

    #[test]
    fn test_untyped_store_value_rejected_on_read() {
        let mut store = MemoryParamStore::new();
        set_param_set(&mut store, &V4Params::default()).unwrap();
        store.set(keys::ENABLE_CALL.as_bytes(), b"\"yes\"".to_vec());

        let err = get_param_set(&store).unwrap_err();
        assert!(matches!(
            err,
            ParamError::Validation(ValidationError {
                key: keys::ENABLE_CALL,
                ..
            })
        ));
    }

    #[test]
    fn test_update_param_applies_valid_change() {
        let mut store = MemoryParamStore::new();
        set_param_set(&mut store, &V4Params::default()).unwrap();

        let next = update_param(&mut store, keys::EXTRA_EIPS, br#"{"eips":[2929,3198]}"#).unwrap();
        assert_eq!(next.eips(), vec![2929, 3198]);
        assert_eq!(get_param_set(&store).unwrap(), next);
    }

    #[test]
    fn test_update_param_rejects_invalid_change_without_writing() {
        let mut store = MemoryParamStore::new();
        set_param_set(&mut store, &V4Params::default()).unwrap();
        let before = store.get(keys::EXTRA_EIPS.as_bytes());

        let err =
            update_param(&mut store, keys::EXTRA_EIPS, br#"{"eips":[1344,9999]}"#).unwrap_err();
        assert!(matches!(
            err,
            ParamError::Validation(ValidationError {
                key: keys::EXTRA_EIPS,
                ..
            })
        ));
        assert_eq!(store.get(keys::EXTRA_EIPS.as_bytes()), before);
    }

    #[test]
    fn test_update_param_rejects_inconsistent_chain_config() {
        let mut store = MemoryParamStore::new();
        set_param_set(&mut store, &V4Params::default()).unwrap();

        let raw = br#"{"berlin_block":10,"london_block":5}"#;
        let err = update_param(&mut store, keys::CHAIN_CONFIG, raw).unwrap_err();
        assert!(matches!(
            err,
            ParamError::Validation(ValidationError {
                key: keys::CHAIN_CONFIG,
                ..
            })
        ));
        assert_eq!(get_param_set(&store).unwrap(), V4Params::default());
    }

    #[test]
    fn test_update_unknown_key() {
        let mut store = MemoryParamStore::new();
        set_param_set(&mut store, &V4Params::default()).unwrap();
        assert!(matches!(
            update_param(&mut store, "MaxGas", b"1"),
            Err(ParamError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_validate_raw() {
        assert!(validate_raw(keys::ENABLE_CREATE, b"false").is_ok());
        assert!(validate_raw(keys::ENABLE_CREATE, b"\"false\"").is_err());
        assert!(matches!(
            validate_raw(keys::EVM_DENOM, b"not json"),
            Err(ParamError::Decode { .. })
        ));
    }
}
