//! Shared utilities for the hatchat workspace.

pub mod logger;
pub mod time;
