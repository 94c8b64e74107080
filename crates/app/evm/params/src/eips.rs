//! Extra EIPs that can be layered on top of the hard fork instruction set.

use serde::{Deserialize, Serialize};

/// EIPs the interpreter knows how to activate independently of the fork
/// schedule. They are applied in order and may override the instruction set
/// selected by the chain configuration.
pub const ACTIVATEABLE_EIPS: [i64; 6] = [1344, 1884, 2200, 2929, 3198, 3529];

/// Returns true if `eip` can be enabled through the extra EIP parameter.
pub fn is_activateable(eip: i64) -> bool {
    ACTIVATEABLE_EIPS.contains(&eip)
}

/// Validate that every EIP is activateable, reporting the first that is not.
pub fn validate_eips(eips: &[i64]) -> Result<(), String> {
    match eips.iter().find(|eip| !is_activateable(**eip)) {
        Some(eip) => Err(format!(
            "EIP {eip} is not activateable, valid EIPs are: {ACTIVATEABLE_EIPS:?}"
        )),
        None => Ok(()),
    }
}

/// Extra EIP list as stored by the V4 parameter layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraEips {
    pub eips: Vec<i64>,
}

impl ExtraEips {
    pub fn new(eips: impl IntoIterator<Item = i64>) -> Self {
        Self {
            eips: eips.into_iter().collect(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_eips(&self.eips)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_all_activateable_eips_accepted() {
        assert!(validate_eips(&ACTIVATEABLE_EIPS).is_ok());
        assert!(validate_eips(&[]).is_ok());
    }

    #[test]
    fn test_first_invalid_eip_reported() {
        let err = validate_eips(&[1344, 9999, 42]).unwrap_err();
        assert!(err.starts_with("EIP 9999 is not activateable"), "{err}");
    }

    #[test]
    fn test_negative_eip_rejected() {
        assert!(ExtraEips::new([-1344]).validate().is_err());
    }
}
