//! Entity <-> model mappers

mod activity;
mod season;

pub use activity::ActivityUpsert;
pub use season::{season_from_model, SeasonInsert};
