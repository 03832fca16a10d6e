//! Outbound adapters (driven side).

pub mod persistence;
