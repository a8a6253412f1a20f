//! Engine services
//!
//! Each service borrows the shared [`EngineContext`](crate::context::EngineContext)
//! and implements one slice of the domain.

pub mod gate;
pub mod jukebox;
pub mod ledger;
pub mod rank;
pub mod season;
pub mod session;

pub use gate::PermissionGate;
pub use jukebox::{Jukebox, PlayOutcome};
pub use ledger::{ActivityLedger, RecordOutcome};
pub use rank::{RankEntry, RankService, RankSnapshot};
pub use season::SeasonCycle;
pub use session::{Advance, MusicSession, PlayState, QueueView};
