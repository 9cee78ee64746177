//! Logic gates combining child results.

use crate::error::PermissionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicGate {
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Not,
}

impl LogicGate {
    pub const ALL: [LogicGate; 6] = [
        LogicGate::And,
        LogicGate::Nand,
        LogicGate::Or,
        LogicGate::Nor,
        LogicGate::Xor,
        LogicGate::Not,
    ];

    /// Canonical keyword used in the raw format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Nand => "NAND",
            Self::Or => "OR",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Not => "NOT",
        }
    }

    /// Matches a raw key against the gate keywords, ignoring case.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|gate| key.eq_ignore_ascii_case(gate.as_str()))
    }

    pub fn min_inputs(self) -> usize {
        match self {
            Self::Xor => 2,
            _ => 1,
        }
    }

    pub fn max_inputs(self) -> Option<usize> {
        match self {
            Self::Not => Some(1),
            _ => None,
        }
    }

    /// Only NOT accepts a bare (non-collection) value.
    pub fn accepts_scalar(self) -> bool {
        self == Self::Not
    }

    pub fn check_arity(self, count: usize) -> Result<(), PermissionError> {
        if count < self.min_inputs() {
            return Err(PermissionError::InvalidGateArity {
                gate: self.as_str().to_string(),
                reason: format!(
                    "requires at least {} input(s), got {}",
                    self.min_inputs(),
                    count
                ),
            });
        }
        if let Some(max) = self.max_inputs() {
            if count > max {
                return Err(PermissionError::InvalidGateArity {
                    gate: self.as_str().to_string(),
                    reason: format!("requires exactly {max} input, got {count}"),
                });
            }
        }
        Ok(())
    }

    /// Combines input results left to right, pulling no more inputs than the
    /// gate needs. The iterator is lazy, so unevaluated inputs are never
    /// computed.
    pub fn apply<I>(self, inputs: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        let mut inputs = inputs.into_iter();
        match self {
            Self::And => inputs.all(|value| value),
            Self::Nand => !inputs.all(|value| value),
            Self::Or => inputs.any(|value| value),
            Self::Nor => !inputs.any(|value| value),
            Self::Xor => {
                let mut seen_true = false;
                let mut seen_false = false;
                for value in inputs {
                    if value {
                        seen_true = true;
                    } else {
                        seen_false = true;
                    }
                    if seen_true && seen_false {
                        trace!("XOR short-circuit: mixed inputs");
                        return true;
                    }
                }
                false
            }
            // Arity is validated at construction, a missing input reads as false.
            Self::Not => !inputs.next().unwrap_or(false),
        }
    }
}

impl fmt::Display for LogicGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
