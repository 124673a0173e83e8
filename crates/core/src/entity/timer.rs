//! Simulated time as an entity.

use crate::entity::stock::Level;
use crate::entity::{generate_id, Entity, Meta};
use crate::simulator::Simulator;

/// An entity tracking elapsed simulated time.
///
/// A timer stages `time + time_step` on tick and commits it on tock, so
/// time-dependent formulas resolve "current time" through the same pull
/// protocol as every other quantity instead of receiving it out-of-band.
pub struct Timer {
    id: String,
    meta: Meta,
    level: Level,
}

impl Timer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::default(),
            level: Level::default(),
        }
    }

    /// A timer with a generated identifier.
    pub fn anonymous() -> Self {
        Self::new(generate_id())
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

impl Entity for Timer {
    fn id(&self) -> &str {
        &self.id
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn init(&self, sim: &Simulator) {
        self.level.seed(sim.time());
    }

    fn tick(&self, sim: &Simulator) {
        self.level.stage(self.level.get() + sim.time_step());
    }

    fn tock(&self) {
        self.level.commit();
    }

    fn value(&self, _sim: &Simulator) -> f64 {
        self.level.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_simulation_time() {
        let mut sim = Simulator::builder()
            .entity(Timer::new("clock"))
            .init_time(2.0)
            .max_time(6.0)
            .time_step(0.5)
            .build();
        sim.init();
        assert_eq!(sim.value("clock"), 2.0);

        while !sim.is_complete() {
            sim.advance();
            assert_eq!(sim.value("clock"), sim.time());
        }
        assert_eq!(sim.value("clock"), 6.0);
    }
}
