//! Time-of-day weighting - rewards activity during community prime time

use chrono::{DateTime, Timelike, Utc};

/// Multiplier for a local hour of day. Buckets are half-open, so the
/// boundary instant takes the bucket it opens (18:00 is already prime
/// time, 23:00 already late night).
pub fn hour_multiplier(hour: u32) -> f64 {
    match hour {
        0..=5 => 0.2,
        6..=8 => 0.8,
        9..=17 => 1.0,
        18..=22 => 1.4,
        _ => 0.6,
    }
}

/// Multiplier for an event timestamp, shifted into the community's local
/// time by a fixed UTC offset (configured per deployment, not per guild)
pub fn multiplier_at(timestamp: DateTime<Utc>, utc_offset_hours: i8) -> f64 {
    let local_hour = (timestamp.hour() as i32 + utc_offset_hours as i32).rem_euclid(24) as u32;
    hour_multiplier(local_hour)
}
