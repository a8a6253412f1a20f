//! Write-behind persistence
//!
//! Engine operations mutate memory first and enqueue a command here; a
//! single worker task drains the queue into the repositories. Enqueueing
//! never blocks the scoring path: a full queue drops the command and
//! logs it. Activity upserts carry whole-row state, so the member's next
//! event supersedes a dropped one.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use podium_core::entities::{MemberActivity, Season, SeasonStatus};
use podium_core::traits::{ActivityRepository, SeasonRepository};
use podium_core::Snowflake;

/// One durable write the engine owes the store
#[derive(Debug, Clone)]
pub enum PersistCommand {
    UpsertActivity(MemberActivity),
    InsertSeason(Season),
    UpdateSeasonStatus {
        season_id: Snowflake,
        status: SeasonStatus,
    },
    ResetSeasonPoints {
        guild_id: Snowflake,
    },
}

impl PersistCommand {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpsertActivity(_) => "UPSERT_ACTIVITY",
            Self::InsertSeason(_) => "INSERT_SEASON",
            Self::UpdateSeasonStatus { .. } => "UPDATE_SEASON_STATUS",
            Self::ResetSeasonPoints { .. } => "RESET_SEASON_POINTS",
        }
    }
}

/// Sending half handed to the engine. Cloneable and non-blocking.
#[derive(Clone)]
pub struct PersistHandle {
    tx: mpsc::Sender<PersistCommand>,
}

impl PersistHandle {
    /// Queue a write without blocking. A full or closed queue drops the
    /// command and logs it.
    pub fn enqueue(&self, command: PersistCommand) {
        match self.tx.try_send(command) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(command)) => {
                warn!(command = command.kind(), "Persist queue full, dropping command");
            }
            Err(mpsc::error::TrySendError::Closed(command)) => {
                warn!(command = command.kind(), "Persist worker gone, dropping command");
            }
        }
    }
}

/// Create a persist queue of the given depth
pub fn channel(capacity: usize) -> (PersistHandle, mpsc::Receiver<PersistCommand>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (PersistHandle { tx }, rx)
}

/// Queue consumer. Owns the receiving half and the repositories.
pub struct Persister {
    activities: Arc<dyn ActivityRepository>,
    seasons: Arc<dyn SeasonRepository>,
    rx: mpsc::Receiver<PersistCommand>,
}

impl Persister {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        seasons: Arc<dyn SeasonRepository>,
        rx: mpsc::Receiver<PersistCommand>,
    ) -> Self {
        Self {
            activities,
            seasons,
            rx,
        }
    }

    /// Run the drain loop on a background task. The task ends once every
    /// `PersistHandle` has been dropped and the queue is empty.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!("Persist worker started");
        while let Some(command) = self.rx.recv().await {
            self.apply(command).await;
        }
        info!("Persist worker stopped");
    }

    /// Apply one command. Failures are logged and skipped; the in-memory
    /// state stays authoritative and a later command for the same row
    /// usually covers the gap.
    async fn apply(&self, command: PersistCommand) {
        let kind = command.kind();
        let result = match command {
            PersistCommand::UpsertActivity(activity) => self.activities.upsert(&activity).await,
            PersistCommand::InsertSeason(season) => self.seasons.insert(&season).await,
            PersistCommand::UpdateSeasonStatus { season_id, status } => {
                self.seasons.update_status(season_id, status).await
            }
            PersistCommand::ResetSeasonPoints { guild_id } => {
                self.activities.reset_season_points(guild_id).await
            }
        };
        if let Err(e) = result {
            warn!(command = kind, error = %e, "Persist command failed");
        }
    }
}
