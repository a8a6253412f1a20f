//! MemberActivity entity - a member's accumulated score in one guild

use chrono::{DateTime, Utc};

use crate::value_objects::{Horizon, Points, Snowflake};

/// Per-guild activity ledger row for one member.
///
/// Season points reset at rollover; lifetime points only ever move through
/// `credit` (monotonic) or an explicit `adjust` (the admin correction path).
#[derive(Debug, Clone, PartialEq)]
pub struct MemberActivity {
    pub guild_id: Snowflake,
    pub member_id: Snowflake,
    pub season_points: Points,
    pub lifetime_points: Points,
    pub voice_seconds: i64,
    pub last_event_at: DateTime<Utc>,
}

impl MemberActivity {
    /// Create a fresh ledger row with zero scores
    pub fn new(guild_id: Snowflake, member_id: Snowflake) -> Self {
        Self {
            guild_id,
            member_id,
            season_points: Points::ZERO,
            lifetime_points: Points::ZERO,
            voice_seconds: 0,
            last_event_at: Utc::now(),
        }
    }

    /// Credit earned points. Lifetime always accrues; the season counter
    /// only moves while the guild's season is accepting points.
    pub fn credit(&mut self, points: Points, season_open: bool) {
        self.lifetime_points += points;
        if season_open {
            self.season_points += points;
        }
        self.last_event_at = Utc::now();
    }

    /// Apply a signed corrective delta to one horizon, floored at zero
    pub fn adjust(&mut self, delta: f64, horizon: Horizon) {
        match horizon {
            Horizon::Season => {
                self.season_points = self.season_points.saturating_add_signed(delta);
            }
            Horizon::Lifetime => {
                self.lifetime_points = self.lifetime_points.saturating_add_signed(delta);
            }
        }
        self.last_event_at = Utc::now();
    }

    /// Accumulate tracked voice presence time
    pub fn add_voice_seconds(&mut self, seconds: i64) {
        self.voice_seconds += seconds.max(0);
    }

    /// Score under the given horizon
    #[inline]
    pub fn points(&self, horizon: Horizon) -> Points {
        match horizon {
            Horizon::Season => self.season_points,
            Horizon::Lifetime => self.lifetime_points,
        }
    }

    /// A member appears on a ranking only after earning a positive score
    #[inline]
    pub fn is_ranked(&self, horizon: Horizon) -> bool {
        self.points(horizon) > Points::ZERO
    }

    /// Zero the season counter (rollover). Lifetime is untouched.
    pub fn reset_season(&mut self) {
        self.season_points = Points::ZERO;
    }
}
