//! Track resolution port - media lookup without media bytes

use async_trait::async_trait;

use crate::entities::SourceRef;
use crate::traits::repositories::RepoResult;

/// Metadata a resolver returns for a play query. The engine builds a
/// `Track` from this plus the requester's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub title: String,
    pub duration_secs: u32,
    pub source: SourceRef,
}

/// Resolves a member's free-form play query (URL or search text) into
/// playable track metadata. Implemented outside the engine, next to
/// whatever media backend the bot fronts.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> RepoResult<TrackDescriptor>;
}
