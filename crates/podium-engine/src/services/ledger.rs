//! Activity ledger - turns observed member activity into credited points
//!
//! `record` is the hot path: it scores an event through the policy, the
//! quality scorer, and the time-of-day multiplier, applies the credit
//! under the shard's locks, and hands the durable write to the persist
//! queue. Nothing here awaits.

use tracing::{debug, info, instrument};

use podium_core::scoring::multiplier_at;
use podium_core::{
    ActivityEvent, ActivityKind, EngineError, Horizon, MemberActivity, Points, Snowflake,
    VoicePerks,
};

use crate::context::EngineContext;
use crate::persist::PersistCommand;
use crate::registry::VoiceSession;

/// What one recorded event credited
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordOutcome {
    /// Points credited to the event's primary subject
    pub points_awarded: Points,
    /// Whether the credit reached the season counter
    pub season_applied: bool,
}

/// Activity ledger service
pub struct ActivityLedger<'a> {
    ctx: &'a EngineContext,
}

impl<'a> ActivityLedger<'a> {
    /// Create a new ActivityLedger
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Record one activity event.
    ///
    /// Session boundaries maintain the voice map and credit nothing.
    /// Perk events credit once per voice session; a perk with no live
    /// session is ignored. Reaction events credit the reactor and the
    /// target author in one ledger write. An `Adjust` kind takes the
    /// admin path and is the only way this returns an error.
    #[instrument(skip(self, event), fields(guild_id = %event.guild_id, member_id = %event.member_id))]
    pub fn record(&self, event: ActivityEvent) -> Result<RecordOutcome, EngineError> {
        let ActivityEvent {
            guild_id,
            member_id,
            kind,
            timestamp,
        } = event;

        if let ActivityKind::Adjust { delta, horizon } = kind {
            self.adjust(guild_id, member_id, delta, horizon)?;
            return Ok(RecordOutcome {
                points_awarded: Points::ZERO,
                season_applied: false,
            });
        }

        let shard = self.ctx.shard(guild_id);

        match &kind {
            ActivityKind::VoiceJoined { channel_id } => {
                shard
                    .voice
                    .write()
                    .insert(member_id, VoiceSession::new(*channel_id));
                debug!(channel_id = %channel_id, "Voice session opened");
                return Ok(RecordOutcome {
                    points_awarded: Points::ZERO,
                    season_applied: false,
                });
            }
            ActivityKind::VoiceLeft => {
                shard.voice.write().remove(&member_id);
                debug!("Voice session closed");
                return Ok(RecordOutcome {
                    points_awarded: Points::ZERO,
                    season_applied: false,
                });
            }
            ActivityKind::VoicePerk { perk } => {
                let mut voice = shard.voice.write();
                let Some(session) = voice.get_mut(&member_id) else {
                    debug!(perk = ?perk, "Perk outside a voice session, ignored");
                    return Ok(RecordOutcome {
                        points_awarded: Points::ZERO,
                        season_applied: false,
                    });
                };
                let flag = VoicePerks::from(*perk);
                if session.credited.contains(flag) {
                    debug!(perk = ?perk, "Perk already credited this session");
                    return Ok(RecordOutcome {
                        points_awarded: Points::ZERO,
                        season_applied: false,
                    });
                }
                session.credited.insert(flag);
            }
            _ => {}
        }

        let multiplier = multiplier_at(timestamp, self.ctx.settings().utc_offset_hours);
        let quality_bonus = match &kind {
            ActivityKind::Message { features } => self.ctx.quality().score(features),
            _ => 0.0,
        };
        let points = Points::new(self.ctx.policy().raw_value(&kind, quality_bonus) * multiplier);

        let voice_secs = match &kind {
            ActivityKind::VoiceTick { minutes, .. } => (minutes.max(0.0) * 60.0).round() as i64,
            _ => 0,
        };
        // Self-reactions earn the given share only
        let reaction_target = match &kind {
            ActivityKind::Reaction { target } if *target != member_id => Some(*target),
            _ => None,
        };
        let received =
            reaction_target.map(|_| Points::new(self.ctx.policy().reaction_received * multiplier));

        let mut members = shard.members.write();
        let season_open = shard.season.read().accepts_points();
        if !season_open && points > Points::ZERO {
            debug!("Season not accepting points, crediting lifetime only");
        }

        let primary = {
            let row = members
                .entry(member_id)
                .or_insert_with(|| MemberActivity::new(guild_id, member_id));
            row.credit(points, season_open);
            if voice_secs > 0 {
                row.add_voice_seconds(voice_secs);
            }
            row.clone()
        };
        let secondary = match (reaction_target, received) {
            (Some(target), Some(received)) => {
                let row = members
                    .entry(target)
                    .or_insert_with(|| MemberActivity::new(guild_id, target));
                row.credit(received, season_open);
                Some(row.clone())
            }
            _ => None,
        };
        drop(members);

        shard.invalidate_ranks();
        self.ctx
            .persist()
            .enqueue(PersistCommand::UpsertActivity(primary));
        if let Some(row) = secondary {
            self.ctx
                .persist()
                .enqueue(PersistCommand::UpsertActivity(row));
        }

        let season_applied = season_open && points > Points::ZERO;
        debug!(points = %points, season_applied, "Activity recorded");
        Ok(RecordOutcome {
            points_awarded: points,
            season_applied,
        })
    }

    /// Admin corrective edit against one horizon. A season-horizon edit
    /// while the season is not Active fails with `SeasonClosed`. Returns
    /// the member's new score on that horizon.
    #[instrument(skip(self))]
    pub fn adjust(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        delta: f64,
        horizon: Horizon,
    ) -> Result<Points, EngineError> {
        let shard = self.ctx.shard(guild_id);

        let mut members = shard.members.write();
        if horizon == Horizon::Season && !shard.season.read().accepts_points() {
            return Err(EngineError::SeasonClosed { guild_id });
        }
        let row = members
            .entry(member_id)
            .or_insert_with(|| MemberActivity::new(guild_id, member_id));
        row.adjust(delta, horizon);
        let new_value = row.points(horizon);
        let snapshot = row.clone();
        drop(members);

        shard.invalidate_ranks();
        self.ctx
            .persist()
            .enqueue(PersistCommand::UpsertActivity(snapshot));
        info!(delta, horizon = %horizon, new_value = %new_value, "Ledger adjusted");
        Ok(new_value)
    }

    /// A member's score on one horizon; zero for members never seen
    pub fn points_of(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        horizon: Horizon,
    ) -> Result<Points, EngineError> {
        let shard = self
            .ctx
            .registry()
            .get(guild_id)
            .ok_or(EngineError::UnknownGuild(guild_id))?;
        let members = shard.members.read();
        Ok(members
            .get(&member_id)
            .map_or(Points::ZERO, |row| row.points(horizon)))
    }

    /// Accumulated voice presence in seconds
    pub fn voice_seconds_of(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
    ) -> Result<i64, EngineError> {
        let shard = self
            .ctx
            .registry()
            .get(guild_id)
            .ok_or(EngineError::UnknownGuild(guild_id))?;
        let members = shard.members.read();
        Ok(members.get(&member_id).map_or(0, |row| row.voice_seconds))
    }
}
