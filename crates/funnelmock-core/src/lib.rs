//! Shared data model for the funnelmock simulation engine.
//!
//! This crate holds the canonical entity records produced by one simulation
//! run, the tenant-facing configuration types, and the reference-data input
//! types supplied by upstream generators (campaign pools, product catalogs).

pub mod catalog;
pub mod config;
pub mod entities;
pub mod errors;
pub mod funnel_steps;

pub use catalog::{CampaignPool, Product};
pub use config::{FunnelConfig, SimulationOptions};
pub use entities::{FunnelEvent, LineItem, Order, Session, SimulationResult, User};
pub use errors::SimulationError;
pub use funnel_steps::{FUNNEL_STEPS, terminal_step_index};
