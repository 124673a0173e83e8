//! A discrete-time simulation engine for System Dynamics models.
//!
//! A model is a collection of named entities (stocks, flows, parameters,
//! delay and smoothing elements, timers) advanced synchronously over
//! simulated time under explicit numerical integration:
//!
//! - [`Entity`] — the shared lifecycle: `init` once, then `tick` (stage next
//!   state) and `tock` (commit it) every step
//! - [`Simulator`] — drives the two-phase step loop, resolves values by
//!   identifier, and fires typed [`Event`]s
//! - [`LoggingSimulator`] — records every entity's value at every step
//! - [`Integrator`] — the pluggable stepping rule, with [`ExplicitEuler`]
//!   provided
//!
//! # Example
//!
//! ```
//! use sysdyn_core::{Flow, Parameter, Simulator, Stock};
//!
//! let mut sim = Simulator::builder()
//!     .entity(Parameter::new("drainRate", 1.0))
//!     .entity(Flow::new("outflow", |sim| -sim.value("drainRate")))
//!     .entity(Stock::new("tank").init_value(10.0).derivative(|sim| sim.value("outflow")))
//!     .max_time(5.0)
//!     .build();
//!
//! sim.execute();
//! assert_eq!(sim.value("tank"), 5.0);
//! ```

pub mod entity;
pub mod error;
pub mod event;
pub mod integrate;
pub mod logging;
pub mod simulator;

pub use entity::delay1::Delay1;
pub use entity::flow::Flow;
pub use entity::parameter::Parameter;
pub use entity::smooth::Smooth;
pub use entity::stock::Stock;
pub use entity::timer::Timer;
pub use entity::{generate_id, Entity, Meta};
pub use error::Error;
pub use event::{Event, HandlerId};
pub use integrate::{ExplicitEuler, Integrator};
pub use logging::{Log, LoggingSimulator};
pub use simulator::Simulator;
