//! Untyped parameter values and keyed, independently validated slots.
//!
//! A parameter store holds raw bytes. Reading them back yields a
//! [`ParamValue`] whose shape is whatever the bytes happened to contain, so
//! every slot re-checks the value against its validator before coercing it
//! into the typed field.

use serde::{Deserialize, Serialize};

use crate::chain_config::ChainConfig;
use crate::denom::validate_denom;
use crate::eips::ExtraEips;
use crate::error::ValidationError;

/// A parameter value as decoded from an untyped store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Str(String),
    Eips(ExtraEips),
    ChainConfig(ChainConfig),
}

impl ParamValue {
    /// Name of the value shape, used in type mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Str(_) => "string",
            ParamValue::Eips(_) => "extra eips",
            ParamValue::ChainConfig(_) => "chain config",
        }
    }
}

/// Predicate run on a raw value before it is written into a typed field.
pub type Validator = fn(&ParamValue) -> Result<(), String>;

pub fn validate_evm_denom(value: &ParamValue) -> Result<(), String> {
    match value {
        ParamValue::Str(denom) => validate_denom(denom),
        other => Err(format!("invalid parameter EVM denom type: {}", other.kind())),
    }
}

pub fn validate_bool(value: &ParamValue) -> Result<(), String> {
    match value {
        ParamValue::Bool(_) => Ok(()),
        other => Err(format!("invalid parameter type: {}", other.kind())),
    }
}

pub fn validate_extra_eips(value: &ParamValue) -> Result<(), String> {
    match value {
        ParamValue::Eips(eips) => eips.validate(),
        other => Err(format!("invalid EIP slice type: {}", other.kind())),
    }
}

pub fn validate_chain_config(value: &ParamValue) -> Result<(), String> {
    match value {
        ParamValue::ChainConfig(config) => config.validate().map_err(|e| e.to_string()),
        other => Err(format!("invalid chain config type: {}", other.kind())),
    }
}

/// Mutable view of one typed field of a parameter set.
#[derive(Debug)]
pub enum ParamSlot<'a> {
    Bool(&'a mut bool),
    Str(&'a mut String),
    Eips(&'a mut ExtraEips),
    ChainConfig(&'a mut ChainConfig),
}

impl ParamSlot<'_> {
    fn get(&self) -> ParamValue {
        match self {
            ParamSlot::Bool(v) => ParamValue::Bool(**v),
            ParamSlot::Str(v) => ParamValue::Str((**v).clone()),
            ParamSlot::Eips(v) => ParamValue::Eips((**v).clone()),
            ParamSlot::ChainConfig(v) => ParamValue::ChainConfig((**v).clone()),
        }
    }

    fn assign(&mut self, value: ParamValue) -> Result<(), ParamValue> {
        match (self, value) {
            (ParamSlot::Bool(slot), ParamValue::Bool(v)) => **slot = v,
            (ParamSlot::Str(slot), ParamValue::Str(v)) => **slot = v,
            (ParamSlot::Eips(slot), ParamValue::Eips(v)) => **slot = v,
            (ParamSlot::ChainConfig(slot), ParamValue::ChainConfig(v)) => **slot = v,
            (_, value) => return Err(value),
        }
        Ok(())
    }
}

/// A (key, typed slot, validator) triple addressable by a parameter store.
#[derive(Debug)]
pub struct ParamSetPair<'a> {
    pub key: &'static str,
    slot: ParamSlot<'a>,
    validator: Validator,
}

impl<'a> ParamSetPair<'a> {
    pub fn new(key: &'static str, slot: ParamSlot<'a>, validator: Validator) -> Self {
        Self {
            key,
            slot,
            validator,
        }
    }

    /// Current value of the slot.
    pub fn value(&self) -> ParamValue {
        self.slot.get()
    }

    /// Run this slot's validator on a raw value.
    pub fn validate(&self, value: &ParamValue) -> Result<(), ValidationError> {
        (self.validator)(value).map_err(|reason| ValidationError::new(self.key, reason))
    }

    /// Validate `value` and, only if it passes, write it into the slot.
    pub fn set(&mut self, value: ParamValue) -> Result<(), ValidationError> {
        self.validate(&value)?;
        self.slot.assign(value).map_err(|rejected| {
            ValidationError::new(
                self.key,
                format!("invalid parameter type: {}", rejected.kind()),
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_untyped_decode_shapes() {
        let decode = |json: &str| serde_json::from_str::<ParamValue>(json).unwrap();

        assert_eq!(decode("true"), ParamValue::Bool(true));
        assert_eq!(decode("\"aphoton\""), ParamValue::Str("aphoton".into()));
        assert_eq!(
            decode(r#"{"eips":[2929]}"#),
            ParamValue::Eips(ExtraEips::new([2929]))
        );
        assert!(matches!(
            decode(r#"{"london_block":5}"#),
            ParamValue::ChainConfig(ChainConfig {
                london_block: Some(5),
                ..
            })
        ));
    }

    #[test]
    fn test_validators_reject_wrong_shape() {
        let text = ParamValue::Str("true".into());
        assert!(validate_bool(&text).is_err());
        assert!(validate_extra_eips(&text).is_err());
        assert!(validate_chain_config(&text).is_err());
        assert!(validate_evm_denom(&ParamValue::Bool(true)).is_err());
    }

    #[test]
    fn test_pair_set_validates_before_write() {
        let mut denom = "aphoton".to_string();
        let mut pair =
            ParamSetPair::new("EVMDenom", ParamSlot::Str(&mut denom), validate_evm_denom);

        let err = pair.set(ParamValue::Str("1bad".into())).unwrap_err();
        assert_eq!(err.key, "EVMDenom");
        assert_eq!(pair.value(), ParamValue::Str("aphoton".into()));

        pair.set(ParamValue::Str("astake".into())).unwrap();
        drop(pair);
        assert_eq!(denom, "astake");
    }

    #[test]
    fn test_pair_set_rejects_mismatched_slot() {
        let mut flag = true;
        // A permissive validator must not let a string into a bool field.
        let mut pair = ParamSetPair::new("EnableCall", ParamSlot::Bool(&mut flag), |_| Ok(()));
        let err = pair.set(ParamValue::Str("false".into())).unwrap_err();
        assert_eq!(err.key, "EnableCall");
        assert!(flag);
    }
}
