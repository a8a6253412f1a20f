//! Domain events emitted by the engine

mod engine_event;

pub use engine_event::{
    EngineEvent, PermissionDeniedEvent, SeasonRolledOverEvent, SessionEndReason, SessionEndedEvent,
    TrackEnqueuedEvent, TrackStartedEvent,
};
