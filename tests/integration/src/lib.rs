//! Integration test utilities for the activity engine
//!
//! This crate provides helpers for assembling engines over the
//! in-memory adapters and fixtures for common activity events.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
