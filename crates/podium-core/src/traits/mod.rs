//! Ports - interfaces the engine needs the outside world to provide

mod repositories;
mod resolver;

pub use repositories::{ActivityRepository, RepoResult, SeasonRepository};
pub use resolver::{TrackDescriptor, TrackResolver};
