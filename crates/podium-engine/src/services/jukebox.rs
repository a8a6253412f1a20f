//! Jukebox - rank-gated control over guild music sessions
//!
//! Every command resolves the guild's shard and takes its `music` lock
//! for the whole command, gate check included. That lock is the
//! serialization point: whichever of two racing commands acquires it
//! first acts on the live session, and the loser observes the result
//! (a stop that lands first leaves a skip with `SessionNotFound`).

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use podium_core::events::{SessionEndedEvent, TrackEnqueuedEvent, TrackStartedEvent};
use podium_core::traits::TrackDescriptor;
use podium_core::{EngineError, EngineEvent, RepeatMode, SessionEndReason, Snowflake, Track};

use crate::context::EngineContext;
use crate::registry::GuildShard;
use crate::services::gate::PermissionGate;
use crate::services::session::{Advance, MusicSession, QueueView};

/// What an enqueue did
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// Session was idle; this track started immediately
    Started(Track),
    /// Appended behind the current track at this zero-based position
    Enqueued { track: Track, position: usize },
}

/// Music control service
pub struct Jukebox<'a> {
    ctx: &'a EngineContext,
}

impl<'a> Jukebox<'a> {
    /// Create a new Jukebox
    pub fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Resolve a member's free-form query and enqueue the result
    #[instrument(skip(self))]
    pub async fn play(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        query: &str,
    ) -> Result<PlayOutcome, EngineError> {
        // Resolution happens before any lock is taken
        let descriptor = self.ctx.resolver().resolve(query).await?;
        self.enqueue(guild_id, actor, descriptor)
    }

    /// Add a resolved track. Ungated: anybody may add to the queue. An
    /// idle guild gets a session with this track playing.
    #[instrument(skip(self, descriptor), fields(title = %descriptor.title))]
    pub fn enqueue(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        descriptor: TrackDescriptor,
    ) -> Result<PlayOutcome, EngineError> {
        let shard = self.ctx.shard(guild_id);
        let track = Track::new(
            descriptor.title,
            descriptor.duration_secs,
            actor,
            descriptor.source,
        );

        let mut music = shard.music.lock();
        let outcome = match music.as_mut() {
            None => {
                *music = Some(MusicSession::start(track.clone()));
                PlayOutcome::Started(track)
            }
            Some(session) => {
                let position = session.enqueue(track.clone());
                PlayOutcome::Enqueued { track, position }
            }
        };
        drop(music);

        match &outcome {
            PlayOutcome::Started(track) => {
                info!(guild_id = %guild_id, track_id = %track.id, "Session opened, track started");
                self.publish_started(guild_id, track);
            }
            PlayOutcome::Enqueued { track, position } => {
                info!(guild_id = %guild_id, track_id = %track.id, position, "Track enqueued");
                self.ctx
                    .bus()
                    .publish(EngineEvent::TrackEnqueued(TrackEnqueuedEvent {
                        guild_id,
                        track_id: track.id,
                        title: track.title.clone(),
                        requester_id: track.requester_id,
                        position: *position,
                        timestamp: Utc::now(),
                    }));
            }
        }
        Ok(outcome)
    }

    /// Skip the current track, advancing per the repeat mode. Gated.
    #[instrument(skip(self))]
    pub fn skip(&self, guild_id: Snowflake, actor: Snowflake) -> Result<Advance, EngineError> {
        let shard = self.resolve_shard(guild_id)?;

        let mut music = shard.music.lock();
        let Some(session) = music.as_mut() else {
            return Err(EngineError::SessionNotFound { guild_id });
        };
        let holder = session.holder();
        PermissionGate::new(self.ctx).check(&shard, guild_id, actor, holder, "skip")?;

        let advance = session.advance();
        if advance == Advance::Drained {
            *music = None;
        }
        drop(music);

        self.publish_advance(guild_id, &advance);
        Ok(advance)
    }

    /// Host signal that the current track finished naturally. Ungated;
    /// a guild with no session is a no-op.
    #[instrument(skip(self))]
    pub fn track_finished(&self, guild_id: Snowflake) -> Option<Advance> {
        let shard = self.ctx.registry().get(guild_id)?;

        let mut music = shard.music.lock();
        let session = music.as_mut()?;
        let advance = session.advance();
        if advance == Advance::Drained {
            *music = None;
        }
        drop(music);

        self.publish_advance(guild_id, &advance);
        Some(advance)
    }

    /// Stop playback and tear the session down. Gated.
    #[instrument(skip(self))]
    pub fn stop(&self, guild_id: Snowflake, actor: Snowflake) -> Result<(), EngineError> {
        let shard = self.resolve_shard(guild_id)?;

        let mut music = shard.music.lock();
        let Some(session) = music.as_mut() else {
            return Err(EngineError::SessionNotFound { guild_id });
        };
        let holder = session.holder();
        PermissionGate::new(self.ctx).check(&shard, guild_id, actor, holder, "stop")?;

        session.stop();
        *music = None;
        drop(music);

        info!(guild_id = %guild_id, "Session stopped");
        self.ctx
            .bus()
            .publish(EngineEvent::SessionEnded(SessionEndedEvent {
                guild_id,
                reason: SessionEndReason::Stopped,
                timestamp: Utc::now(),
            }));
        Ok(())
    }

    /// Remove the waiting track at a 1-based position. Gated.
    #[instrument(skip(self))]
    pub fn remove_at(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        position: usize,
    ) -> Result<Track, EngineError> {
        let shard = self.resolve_shard(guild_id)?;

        let mut music = shard.music.lock();
        let Some(session) = music.as_mut() else {
            return Err(EngineError::SessionNotFound { guild_id });
        };
        let holder = session.holder();
        PermissionGate::new(self.ctx).check(&shard, guild_id, actor, holder, "remove")?;

        let removed = session.remove_at(position)?;
        drop(music);

        info!(guild_id = %guild_id, track_id = %removed.id, position, "Track removed");
        Ok(removed)
    }

    /// Change the repeat mode. Gated.
    #[instrument(skip(self))]
    pub fn set_repeat(
        &self,
        guild_id: Snowflake,
        actor: Snowflake,
        mode: RepeatMode,
    ) -> Result<(), EngineError> {
        let shard = self.resolve_shard(guild_id)?;

        let mut music = shard.music.lock();
        let Some(session) = music.as_mut() else {
            return Err(EngineError::SessionNotFound { guild_id });
        };
        let holder = session.holder();
        PermissionGate::new(self.ctx).check(&shard, guild_id, actor, holder, "repeat")?;

        session.set_repeat(mode);
        info!(guild_id = %guild_id, mode = ?mode, "Repeat mode set");
        Ok(())
    }

    /// Snapshot of the live session for display. Ungated.
    pub fn queue_view(&self, guild_id: Snowflake) -> Result<QueueView, EngineError> {
        let shard = self.resolve_shard(guild_id)?;
        let music = shard.music.lock();
        music
            .as_ref()
            .map(MusicSession::view)
            .ok_or(EngineError::SessionNotFound { guild_id })
    }

    /// Control commands address existing sessions only, so an unseen
    /// guild reads as "no session" rather than minting a shard
    fn resolve_shard(&self, guild_id: Snowflake) -> Result<Arc<GuildShard>, EngineError> {
        self.ctx
            .registry()
            .get(guild_id)
            .ok_or(EngineError::SessionNotFound { guild_id })
    }

    fn publish_started(&self, guild_id: Snowflake, track: &Track) {
        self.ctx
            .bus()
            .publish(EngineEvent::TrackStarted(TrackStartedEvent {
                guild_id,
                track_id: track.id,
                title: track.title.clone(),
                requester_id: track.requester_id,
                timestamp: Utc::now(),
            }));
    }

    fn publish_advance(&self, guild_id: Snowflake, advance: &Advance) {
        match advance {
            Advance::Next(track) => {
                info!(guild_id = %guild_id, track_id = %track.id, "Track started");
                self.publish_started(guild_id, track);
            }
            Advance::Drained => {
                info!(guild_id = %guild_id, "Queue drained, session ended");
                self.ctx
                    .bus()
                    .publish(EngineEvent::SessionEnded(SessionEndedEvent {
                        guild_id,
                        reason: SessionEndReason::Drained,
                        timestamp: Utc::now(),
                    }));
            }
        }
    }
}
