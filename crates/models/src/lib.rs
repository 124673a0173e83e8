//! Example System Dynamics models.
//!
//! These models are client code for the [`sysdyn_core`] engine: each is a
//! parameter record whose [`entities`] method assembles the stocks, flows,
//! and parameters making up the model. Hand the result to a simulator:
//!
//! ```
//! use sysdyn_core::Simulator;
//! use sysdyn_models::PredatorPrey;
//!
//! let mut sim = Simulator::builder()
//!     .entities(PredatorPrey::default().entities())
//!     .max_time(100.0)
//!     .build();
//! sim.execute();
//! ```
//!
//! [`entities`]: PredatorPrey::entities

mod engineering_process;
mod innovation_diffusion;
mod predator_prey;

pub use engineering_process::EngineeringProcess;
pub use innovation_diffusion::InnovationDiffusion;
pub use predator_prey::PredatorPrey;
