//! Lotka-Volterra predator-prey dynamics.

use sysdyn_core::{Entity, Flow, Parameter, Stock};

/// Parameters for the predator-prey model.
pub struct PredatorPrey {
    pub initial_predator: f64,
    pub initial_prey: f64,
    pub predator_death_rate: f64,
    pub prey_birth_rate: f64,
    /// Predator births per predator per prey.
    pub predator_birth_from_prey: f64,
    /// Prey deaths per prey per predator.
    pub prey_death_from_predator: f64,
}

impl Default for PredatorPrey {
    fn default() -> Self {
        Self {
            initial_predator: 111.9,
            initial_prey: 164.2,
            predator_death_rate: 0.12,
            prey_birth_rate: 0.16,
            predator_birth_from_prey: 0.001,
            prey_death_from_predator: 0.0008,
        }
    }
}

impl PredatorPrey {
    /// Assembles the model's entities.
    #[must_use]
    pub fn entities(&self) -> Vec<Box<dyn Entity>> {
        let predator_birth_from_prey = self.predator_birth_from_prey;
        let prey_death_from_predator = self.prey_death_from_predator;
        vec![
            Box::new(Flow::new("predatorBirthRate", move |sim| {
                sim.value("prey") * predator_birth_from_prey
            })),
            Box::new(Flow::new("predatorBirths", |sim| {
                sim.value("predator") * sim.value("predatorBirthRate")
            })),
            Box::new(
                Stock::new("predator")
                    .init_value(self.initial_predator)
                    .derivative(|sim| {
                        sim.value("predatorBirths") - sim.value("predatorDeaths")
                    }),
            ),
            Box::new(Parameter::new("predatorDeathRate", self.predator_death_rate)),
            Box::new(Flow::new("predatorDeaths", |sim| {
                sim.value("predator") * sim.value("predatorDeathRate")
            })),
            Box::new(Parameter::new("preyBirthRate", self.prey_birth_rate)),
            Box::new(Flow::new("preyBirths", |sim| {
                sim.value("prey") * sim.value("preyBirthRate")
            })),
            Box::new(
                Stock::new("prey")
                    .init_value(self.initial_prey)
                    .derivative(|sim| sim.value("preyBirths") - sim.value("preyDeaths")),
            ),
            Box::new(Flow::new("preyDeathRate", move |sim| {
                sim.value("predator") * prey_death_from_predator
            })),
            Box::new(Flow::new("preyDeaths", |sim| {
                sim.value("prey") * sim.value("preyDeathRate")
            })),
        ]
    }
}
