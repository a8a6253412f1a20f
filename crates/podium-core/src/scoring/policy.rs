//! Scoring policy - the tunable point values behind every credit

use serde::{Deserialize, Serialize};

use crate::scoring::event::{ActivityKind, VoicePerk};

/// Point weights for each activity source. `Default` carries the
/// production values; tests swap in flat policies where convenient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Per-minute rate while alone in a voice channel
    pub voice_solo_per_min: f64,
    /// Per-minute rate with at least one other human present
    pub voice_group_per_min: f64,
    pub perk_camera: f64,
    pub perk_screen_share: f64,
    pub perk_live_stream: f64,
    /// Flat value every message earns
    pub message_base: f64,
    /// Upper bound on the quality bonus a message can add
    pub message_quality_cap: f64,
    /// Hard ceiling for base + bonus of a single message
    pub message_cap: f64,
    pub reaction_given: f64,
    pub reaction_received: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            voice_solo_per_min: 0.1,
            voice_group_per_min: 2.0,
            perk_camera: 3.0,
            perk_screen_share: 5.0,
            perk_live_stream: 8.0,
            message_base: 0.15,
            message_quality_cap: 0.35,
            message_cap: 0.5,
            reaction_given: 0.1,
            reaction_received: 0.2,
        }
    }
}

impl ScoringPolicy {
    /// One-off bonus for enabling a voice perk
    pub fn perk_value(&self, perk: VoicePerk) -> f64 {
        match perk {
            VoicePerk::Camera => self.perk_camera,
            VoicePerk::ScreenShare => self.perk_screen_share,
            VoicePerk::LiveStream => self.perk_live_stream,
        }
    }

    /// Value of a presence tick. Group rate needs at least two humans
    /// in the channel; bots never count toward `humans_present`.
    pub fn voice_tick_value(&self, minutes: f64, humans_present: u32) -> f64 {
        let rate = if humans_present >= 2 {
            self.voice_group_per_min
        } else {
            self.voice_solo_per_min
        };
        minutes.max(0.0) * rate
    }

    /// Value of a message given its quality bonus, capped twice: the
    /// bonus alone by `message_quality_cap`, the sum by `message_cap`
    pub fn message_value(&self, quality_bonus: f64) -> f64 {
        let bonus = quality_bonus.clamp(0.0, self.message_quality_cap);
        (self.message_base + bonus).min(self.message_cap)
    }

    /// Raw (pre-multiplier) value this event earns its primary subject.
    ///
    /// Reaction events return the reactor's share; the target author's
    /// `reaction_received` credit is issued separately by the ledger.
    /// Session boundaries and admin adjustments carry no scored value.
    pub fn raw_value(&self, kind: &ActivityKind, quality_bonus: f64) -> f64 {
        match kind {
            ActivityKind::VoiceTick { minutes, humans_present } => {
                self.voice_tick_value(*minutes, *humans_present)
            }
            ActivityKind::VoicePerk { perk } => self.perk_value(*perk),
            ActivityKind::Message { .. } => self.message_value(quality_bonus),
            ActivityKind::Reaction { .. } => self.reaction_given,
            ActivityKind::VoiceJoined { .. } | ActivityKind::VoiceLeft | ActivityKind::Adjust { .. } => 0.0,
        }
    }
}
