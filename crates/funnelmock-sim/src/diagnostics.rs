//! Funnel drop-off diagnostics derived from a finished simulation result.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use funnelmock_core::{FUNNEL_STEPS, SimulationResult};

/// Reach/drop statistics for one funnel step.
#[derive(Debug, Clone, Serialize)]
pub struct StepStats {
    pub step: String,
    /// Sessions whose max depth was at least this step's index.
    pub reached: u64,
    /// Sessions that stopped exactly at this step.
    pub dropped: u64,
    pub pct_of_top: f64,
    pub drop_pct: f64,
}

/// Aggregate funnel report for validation and printing.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelSummary {
    pub days: u32,
    pub users: u64,
    pub sessions: u64,
    pub events: u64,
    pub orders: u64,
    pub customers: u64,
    pub repeat_customers: u64,
    pub avg_orders_per_day: f64,
    pub steps: Vec<StepStats>,
    /// How many customers placed 1, 2, ... orders.
    pub order_count_distribution: BTreeMap<u32, u64>,
}

impl FunnelSummary {
    pub fn from_result(result: &SimulationResult, days: u32) -> Self {
        let sessions = result.sessions.len() as u64;

        let mut depth_counts: BTreeMap<usize, u64> = BTreeMap::new();
        for session in &result.sessions {
            *depth_counts.entry(session.max_funnel_depth).or_insert(0) += 1;
        }

        let mut steps = Vec::with_capacity(FUNNEL_STEPS.len());
        let mut remaining = sessions;
        for (index, step) in FUNNEL_STEPS.iter().enumerate() {
            let reached = remaining;
            let dropped = depth_counts.get(&index).copied().unwrap_or(0);
            steps.push(StepStats {
                step: step.to_string(),
                reached,
                dropped,
                pct_of_top: percentage(reached, sessions),
                drop_pct: percentage(dropped, reached),
            });
            remaining = remaining.saturating_sub(dropped);
        }

        let customers = result.users.iter().filter(|user| user.is_customer);
        let mut order_count_distribution = BTreeMap::new();
        let mut customer_count = 0_u64;
        let mut repeat_customers = 0_u64;
        for user in customers {
            customer_count += 1;
            if user.order_count > 1 {
                repeat_customers += 1;
            }
            *order_count_distribution.entry(user.order_count).or_insert(0) += 1;
        }

        Self {
            days,
            users: result.users.len() as u64,
            sessions,
            events: result.events.len() as u64,
            orders: result.orders.len() as u64,
            customers: customer_count,
            repeat_customers,
            avg_orders_per_day: result.orders.len() as f64 / f64::from(days.max(1)),
            steps,
            order_count_distribution,
        }
    }

    /// Render the summary as the validation table printed after a run.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "simulation: {} days | {} users | {} sessions | {} events | {} orders",
            self.days, self.users, self.sessions, self.events, self.orders
        );
        let _ = writeln!(
            out,
            "customers: {} | repeat buyers: {} | avg orders/day: {:.1}",
            self.customers, self.repeat_customers, self.avg_orders_per_day
        );
        let _ = writeln!(
            out,
            "{:<25} {:>8} {:>9} {:>8} {:>7}",
            "step", "reached", "% of top", "dropped", "drop %"
        );
        for step in &self.steps {
            let bar = "#".repeat((step.pct_of_top / 2.0) as usize);
            let _ = writeln!(
                out,
                "{:<25} {:>8} {:>8.1}% {:>8} {:>6.1}%  {}",
                step.step, step.reached, step.pct_of_top, step.dropped, step.drop_pct, bar
            );
        }
        out
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnelmock_core::{CampaignPool, FunnelConfig, SimulationOptions};

    use crate::driver::SimulationDriver;

    fn small_run() -> SimulationResult {
        let options = SimulationOptions {
            days: 14,
            base_seed: 7,
            daily_orders_target: 5.0,
            min_users: 200,
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        };
        let driver =
            SimulationDriver::new(options, FunnelConfig::default()).expect("valid options");
        driver.run(&CampaignPool::new(), Vec::new())
    }

    #[test]
    fn depth_distribution_is_monotonically_non_increasing() {
        let result = small_run();
        let summary = FunnelSummary::from_result(&result, 14);
        for pair in summary.steps.windows(2) {
            assert!(
                pair[1].reached <= pair[0].reached,
                "reach must not grow deeper in the funnel"
            );
        }
        assert_eq!(summary.steps[0].reached, summary.sessions);
    }

    #[test]
    fn drops_account_for_every_session() {
        let result = small_run();
        let summary = FunnelSummary::from_result(&result, 14);
        let dropped: u64 = summary.steps.iter().map(|step| step.dropped).sum();
        assert_eq!(dropped, summary.sessions);
    }

    #[test]
    fn render_contains_every_step_name() {
        let result = small_run();
        let rendered = FunnelSummary::from_result(&result, 14).render();
        for step in FUNNEL_STEPS {
            assert!(rendered.contains(step), "missing step {step}");
        }
    }
}
