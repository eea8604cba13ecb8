//! Command implementations

pub mod diagnose;
