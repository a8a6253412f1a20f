//! Permission gate - season rank decides who may drive a session
//!
//! A member always controls their own session. Anyone else needs a
//! strictly better season rank than the session holder.

use chrono::Utc;
use tracing::debug;

use podium_core::events::PermissionDeniedEvent;
use podium_core::{EngineError, EngineEvent, Horizon, Snowflake};

use crate::context::EngineContext;
use crate::registry::GuildShard;
use crate::services::rank;

/// Permission gate service
pub struct PermissionGate<'a> {
    ctx: &'a EngineContext,
}

impl<'a> PermissionGate<'a> {
    /// Create a new PermissionGate
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Query form: answers without erroring or announcing anything
    pub fn can_control(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        target: Snowflake,
    ) -> Result<bool, EngineError> {
        let shard = self
            .ctx
            .registry()
            .get(guild_id)
            .ok_or(EngineError::UnknownGuild(guild_id))?;
        Ok(Self::decide(&shard, actor, target))
    }

    /// Enforcement form used by session commands. A denial comes back as
    /// an error and goes out on the bus with the refused operation name.
    pub(crate) fn check(
        &self,
        shard: &GuildShard,
        guild_id: Snowflake,
        actor: Snowflake,
        holder: Snowflake,
        operation: &'static str,
    ) -> Result<(), EngineError> {
        if Self::decide(shard, actor, holder) {
            return Ok(());
        }
        debug!(guild_id = %guild_id, actor = %actor, holder = %holder, operation, "Control denied");
        self.ctx
            .bus()
            .publish(EngineEvent::PermissionDenied(PermissionDeniedEvent {
                guild_id,
                actor_id: actor,
                holder_id: holder,
                operation: operation.to_string(),
                timestamp: Utc::now(),
            }));
        Err(EngineError::PermissionDenied { actor, holder })
    }

    /// Self always passes. Otherwise both sides need a ledger record,
    /// and the actor needs the strictly lower effective season rank.
    /// Members with a record but no points rank one past the board, so
    /// two unranked members never control each other.
    fn decide(shard: &GuildShard, actor: Snowflake, target: Snowflake) -> bool {
        if actor == target {
            return true;
        }
        {
            let members = shard.members.read();
            if !members.contains_key(&actor) || !members.contains_key(&target) {
                return false;
            }
        }
        let snapshot = rank::shard_snapshot(shard, Horizon::Season);
        let floor = snapshot.total_ranked() + 1;
        let actor_rank = snapshot.rank_of(actor).map_or(floor, |(rank, _)| rank);
        let target_rank = snapshot.rank_of(target).map_or(floor, |(rank, _)| rank);
        actor_rank < target_rank
    }
}
