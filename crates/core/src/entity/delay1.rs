//! First-order exponential delay.

use crate::entity::stock::Level;
use crate::entity::{generate_id, Entity, Meta, ValueFn};
use crate::simulator::Simulator;

/// How a delay or smoothing element is seeded at `init` time.
pub(crate) enum DelaySeed {
    Value(f64),
    With(ValueFn),
    /// Seed from the element's own input, observed once at `init` time.
    FromInput,
}

/// A first-order exponential delay of an input signal, modeling
///
/// ```text
/// delay_time * dy/dt = input - y
/// ```
///
/// Fed a constant input, the value converges to that input; `delay_time`
/// controls only the approach rate, not the asymptote.
///
/// The staged update integrates `value * delay_time` by the raw derivative
/// `input - value` and divides the result by `delay_time`, rather than
/// integrating `value` by a scaled derivative. Both forms describe the same
/// ODE but accumulate integration error in different quantities; existing
/// models depend on this one.
pub struct Delay1 {
    id: String,
    meta: Meta,
    level: Level,
    delay_time: f64,
    init: DelaySeed,
    input: Option<ValueFn>,
}

impl Delay1 {
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

    /// A delay with a generated identifier.
    pub fn anonymous() -> Self {
        Self::new(generate_id())
    }

    /// Sets the delay time constant (default `1.0`).
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

    /// Sets the input signal being delayed (default zero).
    #[must_use]
    pub fn input(mut self, f: impl Fn(&Simulator) -> f64 + 'static) -> Self {
        self.input = Some(Box::new(f));
        self
    }

    /// Seeds the delay with a constant initial value (default `0.0`).
    #[must_use]
    pub fn init_value(mut self, value: f64) -> Self {
        self.init = DelaySeed::Value(value);
        self
    }

    /// Seeds the delay from other entities' values, observed once at `init`
    /// time.
    #[must_use]
    pub fn init_with(mut self, f: impl Fn(&Simulator) -> f64 + 'static) -> Self {
        self.init = DelaySeed::With(Box::new(f));
        self
    }

    /// Seeds the delay from its own input, so a run starts already settled
    /// when the input starts at its steady value.
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

impl Entity for Delay1 {
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
        let derivative = self.input_value(sim) - value;
        self.level
            .stage(sim.integrate(value * self.delay_time, derivative) / self.delay_time);
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

    fn run_delay(delay_time: f64, steps: usize) -> f64 {
        let mut sim = Simulator::builder()
            .entity(Delay1::new("delayed").delay_time(delay_time).input(|_| 1.0))
            .max_time(steps as f64)
            .build();
        sim.execute();
        sim.value("delayed")
    }

    #[test]
    fn one_step_matches_the_reformulated_update() {
        // v = 0, T = 4, input = 1, dt = 0.25:
        // next = (v*T + (input - v)*dt) / T = 0.25/4
        let mut sim = Simulator::builder()
            .entity(Delay1::new("delayed").delay_time(4.0).input(|_| 1.0))
            .max_time(0.25)
            .time_step(0.25)
            .build();
        sim.init();
        sim.advance();

        assert_relative_eq!(sim.value("delayed"), 0.0625);
    }

    #[test]
    fn constant_input_converges_regardless_of_delay_time() {
        let fast = run_delay(2.0, 200);
        let slow = run_delay(10.0, 200);

        assert_relative_eq!(fast, 1.0, epsilon = 1e-6);
        assert_relative_eq!(slow, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn seeding_from_input_starts_settled() {
        let mut sim = Simulator::builder()
            .entity(
                Delay1::new("delayed")
                    .delay_time(4.0)
                    .input(|_| 0.12)
                    .init_from_input(),
            )
            .max_time(50.0)
            .build();
        sim.init();
        assert_relative_eq!(sim.value("delayed"), 0.12);

        sim.execute();
        assert_relative_eq!(sim.value("delayed"), 0.12, epsilon = 1e-9);
    }

    #[test]
    #[should_panic(expected = "delay time must be strictly positive")]
    fn zero_delay_time_is_rejected() {
        let _ = Delay1::new("delayed").delay_time(0.0);
    }
}
