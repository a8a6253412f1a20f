//! Music session state - one guild's queue and playback position
//!
//! Pure state machine, no locks and no IO. The jukebox service owns the
//! locking and event publishing around it.

use std::collections::VecDeque;

use podium_core::{EngineError, RepeatMode, Snowflake, Track};

/// Whether the session believes audio is flowing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Stopped,
}

/// What the session decided when asked to advance
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// This track plays next
    Next(Track),
    /// Nothing left to play; the session is over
    Drained,
}

/// Read-only snapshot of a session for display
#[derive(Debug, Clone, PartialEq)]
pub struct QueueView {
    pub current: Track,
    pub upcoming: Vec<Track>,
    pub repeat: RepeatMode,
    pub state: PlayState,
}

/// One guild's live playback session: the current track plus the waiting
/// queue. Created by the first enqueue, destroyed on stop or drain.
#[derive(Debug)]
pub struct MusicSession {
    current: Track,
    queue: VecDeque<Track>,
    repeat: RepeatMode,
    state: PlayState,
}

impl MusicSession {
    /// Open a session with its first track already playing
    pub fn start(first: Track) -> Self {
        Self {
            current: first,
            queue: VecDeque::new(),
            repeat: RepeatMode::default(),
            state: PlayState::Playing,
        }
    }

    /// The track currently playing
    #[inline]
    pub fn current(&self) -> &Track {
        &self.current
    }

    /// Requester of the current track; every control command gates
    /// against this member
    #[inline]
    pub fn holder(&self) -> Snowflake {
        self.current.requester_id
    }

    #[inline]
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    #[inline]
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Number of tracks waiting behind the current one
    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Append a track, returning its zero-based queue position
    pub fn enqueue(&mut self, track: Track) -> usize {
        self.queue.push_back(track);
        self.queue.len() - 1
    }

    /// Finish the current track and decide what plays next.
    ///
    /// Repeat Off discards the finished track, Track re-enqueues it at
    /// the front (the same track replays), Queue re-enqueues it at the
    /// back. An empty queue after that drains the session, which only
    /// repeat Off can reach.
    pub fn advance(&mut self) -> Advance {
        let finished = self.current.clone();
        match self.repeat {
            RepeatMode::Off => {}
            RepeatMode::Track => self.queue.push_front(finished),
            RepeatMode::Queue => self.queue.push_back(finished),
        }
        match self.queue.pop_front() {
            Some(next) => {
                self.current = next.clone();
                Advance::Next(next)
            }
            None => Advance::Drained,
        }
    }

    /// Remove the waiting track at a 1-based position
    pub fn remove_at(&mut self, position: usize) -> Result<Track, EngineError> {
        if position == 0 {
            return Err(EngineError::PositionOutOfRange {
                position,
                queue_len: self.queue.len(),
            });
        }
        match self.queue.remove(position - 1) {
            Some(track) => Ok(track),
            None => Err(EngineError::PositionOutOfRange {
                position,
                queue_len: self.queue.len(),
            }),
        }
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Halt playback and clear the queue. The owning shard drops the
    /// session right after.
    pub fn stop(&mut self) {
        self.queue.clear();
        self.state = PlayState::Stopped;
    }

    /// Snapshot for display
    pub fn view(&self) -> QueueView {
        QueueView {
            current: self.current.clone(),
            upcoming: self.queue.iter().cloned().collect(),
            repeat: self.repeat,
            state: self.state,
        }
    }
}
