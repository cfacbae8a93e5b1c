use thiserror::Error;

/// Errors emitted by the simulation engine.
///
/// The core performs no I/O, so the taxonomy is purely about degenerate
/// configuration. Empty reference data (campaign pool, product catalog) is
/// not an error: the engine degrades per the documented policy instead.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation options: {0}")]
    InvalidOptions(String),
}
