//! Deterministic orchestration of one simulation run.

use chrono::{Duration, NaiveDateTime};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use funnelmock_core::{
    CampaignPool, FunnelConfig, Product, SimulationError, SimulationOptions, SimulationResult,
};

use crate::factory::{create_session, create_user};
use crate::funnel::{decide_return, next_session_delay, walk_session};
use crate::traffic::{build_traffic_sources, resolve_traffic};

/// Drives the funnel state machine over a sized user population and
/// assembles the aggregate [`SimulationResult`].
///
/// Each user draws from an independent rng substream keyed by
/// `(base_seed, user_index)`, so the produced entity set is identical for a
/// given `(base_seed, days, config)` tuple regardless of execution order
/// and the per-user loop could be parallelized without changing output.
#[derive(Debug, Clone)]
pub struct SimulationDriver {
    options: SimulationOptions,
    config: FunnelConfig,
}

impl SimulationDriver {
    /// Validate options up front; degenerate windows or order targets are
    /// rejected before any simulation work.
    pub fn new(
        options: SimulationOptions,
        config: FunnelConfig,
    ) -> Result<Self, SimulationError> {
        options.validate()?;
        Ok(Self { options, config })
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    /// Run the simulation against upstream reference data.
    ///
    /// An empty campaign pool degrades to organic-only attribution and an
    /// empty product catalog produces purchase events but no orders;
    /// neither is an error.
    pub fn run(
        &self,
        campaign_pool: &CampaignPool,
        product_catalog: Vec<Product>,
    ) -> SimulationResult {
        let traffic_sources = build_traffic_sources(campaign_pool);
        let total_users = self.options.total_users();
        let window_seconds = u64::from(self.options.days) * 86_400;

        let end_time: NaiveDateTime = self
            .options
            .end_date
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default();
        let start_time = end_time - Duration::days(i64::from(self.options.days));

        info!(
            seed = self.options.base_seed,
            days = self.options.days,
            users = total_users,
            paid_sources = traffic_sources.iter().filter(|s| s.is_paid).count(),
            products = product_catalog.len(),
            "simulation started"
        );

        let mut result = SimulationResult::default();
        result.products = product_catalog;

        for user_index in 0..total_users {
            let mut rng =
                ChaCha8Rng::seed_from_u64(user_stream_seed(self.options.base_seed, user_index));
            let mut user = create_user(&mut rng);

            let first_offset = rng.random_range(0..window_seconds.max(1));
            let mut current_time = start_time + Duration::seconds(first_offset as i64);

            let mut session_number = 0;
            while current_time < end_time {
                session_number += 1;

                let traffic = resolve_traffic(&traffic_sources, &mut rng);
                let mut session =
                    create_session(&user, session_number, current_time, &traffic, &mut rng);

                let walk = walk_session(
                    &mut session,
                    &mut user,
                    &self.config,
                    &result.products,
                    &mut rng,
                );

                result.events.extend(walk.events);
                if let Some(order) = walk.order {
                    result.orders.push(order);
                }
                result.sessions.push(session);

                if decide_return(&self.config, walk.max_depth, &mut rng) {
                    current_time = walk.end_time + next_session_delay(&mut rng);
                } else {
                    break;
                }
            }

            result.users.push(user);
        }

        result.rebuild_indexes();

        info!(
            users = result.users.len(),
            sessions = result.sessions.len(),
            events = result.events.len(),
            orders = result.orders.len(),
            "simulation completed"
        );

        result
    }
}

/// Seed for one user's rng substream; FNV-style mixing of the base seed and
/// the user's position in the population.
fn user_stream_seed(base_seed: u64, user_index: u64) -> u64 {
    let mut hash = base_seed ^ user_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    hash ^= 0xcbf2_9ce4_8422_2325;
    hash.wrapping_mul(0x0000_0100_0000_01b3)
}
