//! PostgreSQL repository implementations

mod activity;
mod error;
mod season;

pub use activity::PgActivityRepository;
pub use season::PgSeasonRepository;
