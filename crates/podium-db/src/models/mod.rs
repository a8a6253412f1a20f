//! Database models

mod activity;
mod season;

pub use activity::MemberActivityModel;
pub use season::SeasonModel;
