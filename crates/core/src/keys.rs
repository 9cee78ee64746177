//! Reserved keys of the raw permission format.

use crate::gate::LogicGate;

pub const NO_BYPASS: &str = "NO_BYPASS";

/// Pre-normalization spelling of [`NO_BYPASS`], still accepted at the top level.
pub const LEGACY_NO_BYPASS: &str = "no_bypass";

pub const TRUE: &str = "TRUE";
pub const FALSE: &str = "FALSE";

/// All keys that can never name a permission type.
pub fn reserved_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = LogicGate::ALL.iter().map(|gate| gate.as_str()).collect();
    keys.extend([NO_BYPASS, TRUE, FALSE]);
    keys
}

/// Parses `"TRUE"` / `"FALSE"` in any letter case.
pub fn parse_boolean_word(word: &str) -> Option<bool> {
    if word.eq_ignore_ascii_case(TRUE) {
        Some(true)
    } else if word.eq_ignore_ascii_case(FALSE) {
        Some(false)
    } else {
        None
    }
}

/// Positional keys are non-empty runs of ASCII digits, e.g. `"0"`.
pub fn is_positional(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}
