//! Scoring horizon - which counter a point delta or ranking applies to

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which accumulation window an operation targets.
///
/// Season counters reset every rollover; lifetime counters never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Horizon {
    Season,
    Lifetime,
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::Season => write!(f, "season"),
            Horizon::Lifetime => write!(f, "lifetime"),
        }
    }
}
