//! Scoring rules - pure functions from activity events to point values
//!
//! Nothing in this module touches state. The engine's ledger feeds events
//! through `ScoringPolicy::raw_value`, multiplies by the time-of-day factor
//! and credits the result.

pub mod clock;
pub mod event;
pub mod policy;
pub mod quality;

pub use clock::{hour_multiplier, multiplier_at};
pub use event::{ActivityEvent, ActivityKind, MessageFeatures, VoicePerk, VoicePerks};
pub use policy::ScoringPolicy;
pub use quality::{HeuristicQualityScorer, QualityScorer};
