//! Token denomination syntax check.

use regex::Regex;
use std::sync::OnceLock;

/// Denominations start with a letter followed by 2 to 127 characters drawn
/// from letters, digits and `/:._-`.
const DENOM_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9/:._-]{2,127}$";

#[allow(clippy::expect_used)]
fn denom_regex() -> &'static Regex {
    static DENOM: OnceLock<Regex> = OnceLock::new();
    DENOM.get_or_init(|| Regex::new(DENOM_PATTERN).expect("constant denom pattern compiles"))
}

/// Validate a token denomination.
pub fn validate_denom(denom: &str) -> Result<(), String> {
    if denom_regex().is_match(denom) {
        Ok(())
    } else {
        Err(format!("invalid denom: '{denom}'"))
    }
}
