//! The ordered funnel-step contract shared by the simulation and every
//! analytics formatter. Step names double as event names in the output.

/// Ordered purchase-funnel steps. Index 0 always fires; the last index is
/// the terminal absorbing state.
pub const FUNNEL_STEPS: [&str; 6] = [
    "session_start",
    "view_item",
    "add_to_cart",
    "begin_checkout",
    "add_payment_info",
    "purchase",
];

/// Index of the terminal `purchase` step.
pub const fn terminal_step_index() -> usize {
    FUNNEL_STEPS.len() - 1
}

/// Lookup key for the advance-probability table, `"{from}_to_{to}"`.
pub fn transition_key(from: &str, to: &str) -> String {
    format!("{from}_to_{to}")
}
