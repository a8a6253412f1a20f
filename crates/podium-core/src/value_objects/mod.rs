//! Value objects - immutable types that represent domain concepts

mod horizon;
mod points;
mod snowflake;

pub use horizon::Horizon;
pub use points::Points;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
