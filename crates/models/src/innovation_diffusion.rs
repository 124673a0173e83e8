//! Innovation diffusion.
//!
//! The classic word-of-mouth adoption structure from Business Dynamics
//! Ch. 9 (Sterman, 2000): a fixed population moves from potential adopters
//! to adopters at a rate driven by contact between the two groups.

use sysdyn_core::{Entity, Flow, Parameter, Stock};

/// Parameters for the innovation-diffusion model.
pub struct InnovationDiffusion {
    /// Fraction of contacts that convert a potential adopter.
    pub adoption_fraction: f64,
    /// Contacts per person per time unit.
    pub contact_rate: f64,
    pub initial_potential_adopters: f64,
    pub initial_adopters: f64,
}

impl Default for InnovationDiffusion {
    fn default() -> Self {
        Self {
            adoption_fraction: 0.37,
            contact_rate: 0.25,
            initial_potential_adopters: 520.0,
            initial_adopters: 6.54,
        }
    }
}

impl InnovationDiffusion {
    /// Assembles the model's entities.
    ///
    /// Both stocks seed their initial values through the simulator so that
    /// the same parameters feed the total-population flow.
    #[must_use]
    pub fn entities(&self) -> Vec<Box<dyn Entity>> {
        vec![
            Box::new(Parameter::new(
                "initialPotentialAdopters",
                self.initial_potential_adopters,
            )),
            Box::new(
                Stock::new("potentialAdopters")
                    .init_with(|sim| sim.value("initialPotentialAdopters"))
                    .derivative(|sim| -sim.value("adoptionRate")),
            ),
            Box::new(Parameter::new("initialAdopters", self.initial_adopters)),
            Box::new(
                Stock::new("adopters")
                    .init_with(|sim| sim.value("initialAdopters"))
                    .derivative(|sim| sim.value("adoptionRate")),
            ),
            Box::new(Flow::new("totalPopulation", |sim| {
                sim.value("initialPotentialAdopters") + sim.value("initialAdopters")
            })),
            Box::new(Parameter::new("contactRate", self.contact_rate)),
            Box::new(Parameter::new("adoptionFraction", self.adoption_fraction)),
            Box::new(Flow::new("adoptionRate", |sim| {
                sim.value("contactRate") * sim.value("adoptionFraction")
                    * sim.value("potentialAdopters") * sim.value("adopters")
                    / sim.value("totalPopulation")
            })),
        ]
    }
}
