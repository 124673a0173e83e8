//! First-order exponential smoothing.

use crate::entity::delay1::DelaySeed;
use crate::entity::stock::Level;
use crate::entity::{generate_id, Entity, Meta, ValueFn};
use crate::simulator::Simulator;

/// First-order exponential smoothing of an input signal, modeling
///
/// ```text
/// dy/dt = (input - y) / delay_time
/// ```
///
/// Unlike [`Delay1`](crate::entity::delay1::Delay1), the smoothing element
/// scales the derivative directly and integrates its value with the standard
/// stock update.
pub struct Smooth {
    id: String,
    meta: Meta,
    level: Level,
    delay_time: f64,
    init: DelaySeed,
    input: Option<ValueFn>,
}

impl Smooth {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::default(),
            level: Level::default(),
            delay_time: 1.0,
            init: DelaySeed::Value(0.0),
            input: None,
        }
    }

    /// A smoothing element with a generated identifier.
    pub fn anonymous() -> Self {
        Self::new(generate_id())
    }

    /// Sets the smoothing time constant (default `1.0`).
    ///
    /// # Panics
    ///
    /// Panics if `delay_time` is not strictly positive.
    #[must_use]
    pub fn delay_time(mut self, delay_time: f64) -> Self {
        assert!(
            delay_time > 0.0,
            "delay time must be strictly positive, got {delay_time}"
        );
        self.delay_time = delay_time;
        self
    }

    /// Sets the input signal being smoothed (default zero).
    #[must_use]
    pub fn input(mut self, f: impl Fn(&Simulator) -> f64 + 'static) -> Self {
        self.input = Some(Box::new(f));
        self
    }

    /// Seeds the element with a constant initial value (default `0.0`).
    #[must_use]
    pub fn init_value(mut self, value: f64) -> Self {
        self.init = DelaySeed::Value(value);
        self
    }

    /// Seeds the element from other entities' values, observed once at
    /// `init` time.
    #[must_use]
    pub fn init_with(mut self, f: impl Fn(&Simulator) -> f64 + 'static) -> Self {
        self.init = DelaySeed::With(Box::new(f));
        self
    }

    /// Seeds the element from its own input, starting the run already
    /// settled.
    #[must_use]
    pub fn init_from_input(mut self) -> Self {
        self.init = DelaySeed::FromInput;
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    fn input_value(&self, sim: &Simulator) -> f64 {
        self.input.as_ref().map_or(0.0, |f| f(sim))
    }
}

impl Entity for Smooth {
    fn id(&self) -> &str {
        &self.id
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn init(&self, sim: &Simulator) {
        let value = match &self.init {
            DelaySeed::Value(value) => *value,
            DelaySeed::With(f) => f(sim),
            DelaySeed::FromInput => self.input_value(sim),
        };
        self.level.seed(value);
    }

    fn tick(&self, sim: &Simulator) {
        let value = self.level.get();
        let derivative = (self.input_value(sim) - value) / self.delay_time;
        self.level.stage(sim.integrate(value, derivative));
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

    use approx::assert_relative_eq;

    #[test]
    fn one_step_applies_the_scaled_derivative() {
        // v = 0, T = 4, input = 1, dt = 0.25: next = v + (input - v)/T * dt
        let mut sim = Simulator::builder()
            .entity(Smooth::new("smoothed").delay_time(4.0).input(|_| 1.0))
            .max_time(0.25)
            .time_step(0.25)
            .build();
        sim.init();
        sim.advance();

        assert_relative_eq!(sim.value("smoothed"), 0.0625);
    }

    #[test]
    fn tracks_a_constant_input_to_steady_state() {
        let mut sim = Simulator::builder()
            .entity(Smooth::new("smoothed").delay_time(5.0).input(|_| 3.0))
            .max_time(300.0)
            .build();
        sim.execute();

        assert_relative_eq!(sim.value("smoothed"), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn lags_behind_a_moving_input() {
        // Smoothing a ramp: the smoothed value always trails the input.
        let mut sim = Simulator::builder()
            .entity(
                Smooth::new("smoothed")
                    .delay_time(3.0)
                    .input(|sim| sim.time()),
            )
            .max_time(20.0)
            .build();
        sim.execute();

        assert!(sim.value("smoothed") < sim.time());
        assert!(sim.value("smoothed") > 0.0);
    }
}
