//! Domain entities - activity ledgers, seasons, and playable tracks

pub mod activity;
pub mod season;
pub mod track;

pub use activity::MemberActivity;
pub use season::{IllegalTransition, Season, SeasonStatus};
pub use track::{RepeatMode, SourceRef, Track, TrackId};
