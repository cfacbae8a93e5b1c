use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::SimulationError;
use crate::funnel_steps::FUNNEL_STEPS;

/// Return probability applied when a depth has no configured entry,
/// matching the "bounced" baseline.
pub const DEFAULT_RETURN_RATE: f64 = 0.06;

/// Cap applied after the returning-customer boost multiplier.
pub const RETURNING_BOOST_CAP: f64 = 0.95;

/// Expected fraction of spawned users that ever purchase. Calibration
/// heuristic used only to size the user population; actual purchase counts
/// are probabilistic outcomes of the funnel walk.
pub const EXPECTED_CONVERSION_FRACTION: f64 = 0.065;

/// Seconds between funnel steps within one session (1 to 30 minutes).
pub const INTRA_SESSION_DELAY_SECONDS: (u64, u64) = (60, 1800);

/// Seconds before a returning user starts the next session (31 minutes to
/// 7 days).
pub const INTER_SESSION_DELAY_SECONDS: (u64, u64) = (1860, 604_800);

/// Tenant-configurable funnel probabilities.
///
/// `advance_rates` is keyed `"{from}_to_{to}"`; `return_rates` is keyed by
/// the max funnel depth a session reached. Missing entries fall back to the
/// documented defaults instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelConfig {
    #[serde(default = "default_advance_rates")]
    pub advance_rates: BTreeMap<String, f64>,
    #[serde(default = "default_return_rates")]
    pub return_rates: BTreeMap<usize, f64>,
    #[serde(default = "default_boost")]
    pub returning_customer_boost: f64,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            advance_rates: default_advance_rates(),
            return_rates: default_return_rates(),
            returning_customer_boost: default_boost(),
        }
    }
}

impl FunnelConfig {
    /// Advance probability for one transition; missing keys mean the
    /// session can never advance past that point.
    pub fn advance_rate(&self, from: &str, to: &str) -> f64 {
        self.advance_rates
            .get(&crate::funnel_steps::transition_key(from, to))
            .copied()
            .unwrap_or(0.0)
    }

    /// Return probability for the depth a session reached.
    pub fn return_rate(&self, max_depth: usize) -> f64 {
        self.return_rates
            .get(&max_depth)
            .copied()
            .unwrap_or(DEFAULT_RETURN_RATE)
    }
}

fn default_advance_rates() -> BTreeMap<String, f64> {
    // Low at the top of the funnel, high near the bottom.
    let rates = [0.55, 0.25, 0.55, 0.75, 0.88];
    FUNNEL_STEPS
        .windows(2)
        .zip(rates)
        .map(|(pair, rate)| (crate::funnel_steps::transition_key(pair[0], pair[1]), rate))
        .collect()
}

fn default_return_rates() -> BTreeMap<usize, f64> {
    // Deeper penetration returns more often, with a post-purchase dip.
    [0.06, 0.15, 0.35, 0.50, 0.60, 0.45]
        .into_iter()
        .enumerate()
        .collect()
}

fn default_boost() -> f64 {
    1.4
}

/// Options for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Simulation window length in days.
    pub days: u32,
    /// Seed for the run; every rng substream derives from it.
    pub base_seed: u64,
    /// Target order volume per day, used to size the user population.
    pub daily_orders_target: f64,
    /// Lower bound on the spawned population.
    pub min_users: u64,
    /// End boundary of the simulation window (exclusive).
    pub end_date: NaiveDate,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            days: 90,
            base_seed: 42,
            daily_orders_target: 15.0,
            min_users: 200,
            end_date: chrono::Utc::now().date_naive(),
        }
    }
}

impl SimulationOptions {
    /// Reject degenerate configuration before any simulation work starts.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.days == 0 {
            return Err(SimulationError::InvalidOptions(
                "days must be positive".to_string(),
            ));
        }
        if self.daily_orders_target <= 0.0 {
            return Err(SimulationError::InvalidOptions(
                "daily_orders_target must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Population size targeting `daily_orders_target * days` orders at the
    /// expected conversion fraction, floored at `min_users`.
    pub fn total_users(&self) -> u64 {
        let orders_target = self.daily_orders_target * self.days as f64;
        let sized = (orders_target / EXPECTED_CONVERSION_FRACTION) as u64;
        sized.max(self.min_users)
    }
}
