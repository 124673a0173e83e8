//! Error types for the simulation engine.

use thiserror::Error;

/// Error type for failures that can be reported by a [`Simulator`].
///
/// Most misconfigurations are deliberately *not* errors: a stock without a
/// derivative integrates to a constant, and a formula that references an
/// unknown entity through [`Simulator::value`] evaluates to NaN. This enum
/// covers the cases the engine can surface as distinguishable failures.
///
/// [`Simulator`]: crate::simulator::Simulator
/// [`Simulator::value`]: crate::simulator::Simulator::value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A lookup by identifier found no matching entity.
    #[error("no entity with id `{0}` is registered with this simulator")]
    UnknownEntity(String),
}
