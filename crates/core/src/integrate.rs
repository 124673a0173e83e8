//! Numerical integration strategies for stock updates.
//!
//! An [`Integrator`] turns a committed value and its current derivative into
//! the value one time step later. The engine ships a single rule, explicit
//! (forward) Euler:
//!
//! ```text
//! x_{n+1} = x_n + dx/dt * dt
//! ```
//!
//! Forward Euler is first-order accurate and its error shrinks linearly with
//! the step size. Models that need a higher-order scheme substitute their own
//! [`Integrator`] when building the simulator; stocks themselves never change.

/// A strategy for advancing a scalar value by one time step.
///
/// Implementations must be pure: the result may depend only on the three
/// arguments, since the same integrator instance is shared by every stock in
/// a simulation.
pub trait Integrator {
    /// Integrates `value` forward by `dt` given its current `derivative`.
    fn integrate(&self, value: f64, derivative: f64, dt: f64) -> f64;
}

/// The explicit (forward) Euler method.
///
/// This is the default integration rule and the only one provided. It is
/// unconditionally first-order: halving the time step roughly halves the
/// integration error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn integrate(&self, value: f64, derivative: f64, dt: f64) -> f64 {
        value + derivative * dt
    }
}
