//! Season entity - a fixed-length competition window with a closing state machine

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// Lifecycle of a season. Legal transitions are
/// Active -> Finalizing -> Archived, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeasonStatus {
    Active,
    Finalizing,
    Archived,
}

impl SeasonStatus {
    /// Durable string form (persisted in the `status` column)
    pub const fn as_str(&self) -> &'static str {
        match self {
            SeasonStatus::Active => "ACTIVE",
            SeasonStatus::Finalizing => "FINALIZING",
            SeasonStatus::Archived => "ARCHIVED",
        }
    }

    /// Parse the durable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(SeasonStatus::Active),
            "FINALIZING" => Some(SeasonStatus::Finalizing),
            "ARCHIVED" => Some(SeasonStatus::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attempted state jump the season lifecycle does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal season transition {from} -> {to}")]
pub struct IllegalTransition {
    pub from: SeasonStatus,
    pub to: SeasonStatus,
}

/// One competition window for one guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub started_at: DateTime<Utc>,
    /// Exclusive upper bound: the season is due once `now >= ends_at`
    pub ends_at: DateTime<Utc>,
    pub status: SeasonStatus,
}

impl Season {
    /// Open a new Active season of the given length
    pub fn open(id: Snowflake, guild_id: Snowflake, started_at: DateTime<Utc>, length: Duration) -> Self {
        Self {
            id,
            guild_id,
            started_at,
            ends_at: started_at + length,
            status: SeasonStatus::Active,
        }
    }

    /// An Active season whose window has elapsed is due for rollover
    #[inline]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == SeasonStatus::Active && now >= self.ends_at
    }

    /// Season points accrue only while the season is Active
    #[inline]
    pub fn accepts_points(&self) -> bool {
        self.status == SeasonStatus::Active
    }

    /// Enter the rollover fence. Only legal from Active.
    pub fn begin_finalizing(&mut self) -> Result<(), IllegalTransition> {
        self.transition(SeasonStatus::Finalizing)
    }

    /// Complete the rollover. Only legal from Finalizing.
    pub fn archive(&mut self) -> Result<(), IllegalTransition> {
        self.transition(SeasonStatus::Archived)
    }

    fn transition(&mut self, to: SeasonStatus) -> Result<(), IllegalTransition> {
        let legal = matches!(
            (self.status, to),
            (SeasonStatus::Active, SeasonStatus::Finalizing)
                | (SeasonStatus::Finalizing, SeasonStatus::Archived)
        );
        if !legal {
            return Err(IllegalTransition { from: self.status, to });
        }
        self.status = to;
        Ok(())
    }
}
