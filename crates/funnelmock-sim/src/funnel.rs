//! The funnel state machine: a linear walk over the ordered funnel steps
//! with one unconditional initial state and one terminal absorbing state.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;

use funnelmock_core::config::{
    INTER_SESSION_DELAY_SECONDS, INTRA_SESSION_DELAY_SECONDS, RETURNING_BOOST_CAP,
};
use funnelmock_core::{FUNNEL_STEPS, FunnelConfig, FunnelEvent, Order, Product, Session, User};

use crate::factory::{create_event, create_order};

/// Outcome of one per-session funnel walk.
#[derive(Debug)]
pub struct SessionWalk {
    pub events: Vec<FunnelEvent>,
    pub order: Option<Order>,
    pub max_depth: usize,
    /// Timestamp of the last emitted event; return delays start here.
    pub end_time: NaiveDateTime,
}

/// Walk one session through the funnel.
///
/// The initial step always fires at the session start time. Every later
/// transition is a strict sequential gate: one Bernoulli draw against the
/// configured advance probability (boosted for returning customers, capped
/// at [`RETURNING_BOOST_CAP`]); the first failed draw ends the walk. An
/// order is created only at the terminal step and only when the product
/// catalog is non-empty; with an empty catalog the purchase event still
/// fires but the session is left unconverted.
pub fn walk_session(
    session: &mut Session,
    user: &mut User,
    config: &FunnelConfig,
    products: &[Product],
    rng: &mut impl Rng,
) -> SessionWalk {
    let mut event_time = session.timestamp;
    let mut max_depth = 0;
    let mut order = None;

    let mut events = vec![create_event(
        session,
        user,
        FUNNEL_STEPS[0],
        event_time,
        0,
        None,
        rng,
    )];

    // One browsing context per session, drawn up front.
    let browsed = if products.is_empty() {
        None
    } else {
        Some(&products[rng.random_range(0..products.len())])
    };

    for step_index in 1..FUNNEL_STEPS.len() {
        let from_step = FUNNEL_STEPS[step_index - 1];
        let to_step = FUNNEL_STEPS[step_index];

        let mut advance_prob = config.advance_rate(from_step, to_step);
        if user.is_customer {
            advance_prob =
                (advance_prob * config.returning_customer_boost).min(RETURNING_BOOST_CAP);
        }

        if rng.random::<f64>() >= advance_prob {
            break;
        }

        let (delay_min, delay_max) = INTRA_SESSION_DELAY_SECONDS;
        event_time += Duration::seconds(rng.random_range(delay_min..=delay_max) as i64);
        max_depth = step_index;

        events.push(create_event(
            session, user, to_step, event_time, step_index, browsed, rng,
        ));

        if step_index == FUNNEL_STEPS.len() - 1 && !products.is_empty() {
            order = Some(create_order(session, user, event_time, products, rng));
        }
    }

    session.max_funnel_depth = max_depth;

    SessionWalk {
        events,
        order,
        max_depth,
        end_time: event_time,
    }
}

/// Decide whether the user starts another session after this one, using the
/// return probability indexed by the depth the session reached.
pub fn decide_return(config: &FunnelConfig, max_depth: usize, rng: &mut impl Rng) -> bool {
    rng.random::<f64>() < config.return_rate(max_depth)
}

/// Draw the delay before a returning user's next session starts.
pub fn next_session_delay(rng: &mut impl Rng) -> Duration {
    let (delay_min, delay_max) = INTER_SESSION_DELAY_SECONDS;
    Duration::seconds(rng.random_range(delay_min..=delay_max) as i64)
}
