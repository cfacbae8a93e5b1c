//! User-funnel simulation engine for funnelmock.
//!
//! Walks anonymous users through a purchase funnel across repeated sessions
//! with probability gates, producing one canonical [`SimulationResult`]
//! (users, sessions, events, orders) that the platform formatters project
//! into per-target schemas. Every random draw flows through seed-derived
//! `ChaCha8Rng` substreams, so a run is reproducible end to end.

pub mod diagnostics;
pub mod driver;
pub mod factory;
pub mod funnel;
pub mod sampling;
pub mod traffic;

pub use diagnostics::FunnelSummary;
pub use driver::SimulationDriver;
pub use funnelmock_core::SimulationResult;
