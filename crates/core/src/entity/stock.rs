//! Integrating state: the stock and its double-buffered level.

use std::cell::Cell;

use crate::entity::{generate_id, Entity, Meta, ValueFn};
use crate::simulator::Simulator;

/// Double-buffered scalar state shared by the stock family and the timer.
///
/// The committed value is the only one observable through
/// [`Entity::value`]; the staged value is written during `tick` and promoted
/// during `tock`. This buffering is what makes step results independent of
/// entity registration order.
#[derive(Debug, Default)]
pub(crate) struct Level {
    value: Cell<f64>,
    staged: Cell<f64>,
}

impl Level {
    /// Writes both buffers, establishing state at the initial time.
    pub(crate) fn seed(&self, value: f64) {
        self.value.set(value);
        self.staged.set(value);
    }

    pub(crate) fn stage(&self, value: f64) {
        self.staged.set(value);
    }

    pub(crate) fn commit(&self) {
        self.value.set(self.staged.get());
    }

    pub(crate) fn get(&self) -> f64 {
        self.value.get()
    }
}

/// How a stock's initial value is obtained at `init` time.
pub(crate) enum Seed {
    Value(f64),
    With(ValueFn),
}

/// A stock in a System Dynamics model: state that persists and integrates a
/// rate over time.
///
/// Each step, the configured integration method advances the committed value
/// by the derivative; the result is staged and committed only after every
/// entity has ticked. A stock with no derivative configured integrates a rate
/// of zero and stays at its initial value; that is a modeling choice, not an
/// error.
pub struct Stock {
    id: String,
    meta: Meta,
    level: Level,
    init: Seed,
    derivative: Option<ValueFn>,
}

impl Stock {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: Meta::default(),
            level: Level::default(),
            init: Seed::Value(0.0),
            derivative: None,
        }
    }

    /// A stock with a generated identifier.
    pub fn anonymous() -> Self {
        Self::new(generate_id())
    }

    /// Seeds the stock with a constant initial value (default `0.0`).
    #[must_use]
    pub fn init_value(mut self, value: f64) -> Self {
        self.init = Seed::Value(value);
        self
    }

    /// Seeds the stock from other entities' values, observed once at `init`
    /// time.
    #[must_use]
    pub fn init_with(mut self, f: impl Fn(&Simulator) -> f64 + 'static) -> Self {
        self.init = Seed::With(Box::new(f));
        self
    }

    /// Sets the governing rate equation, resolved against committed state on
    /// every tick.
    #[must_use]
    pub fn derivative(mut self, f: impl Fn(&Simulator) -> f64 + 'static) -> Self {
        self.derivative = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    fn derivative_value(&self, sim: &Simulator) -> f64 {
        self.derivative.as_ref().map_or(0.0, |f| f(sim))
    }
}

impl Entity for Stock {
    fn id(&self) -> &str {
        &self.id
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn init(&self, sim: &Simulator) {
        let value = match &self.init {
            Seed::Value(value) => *value,
            Seed::With(f) => f(sim),
        };
        self.level.seed(value);
    }

    fn tick(&self, sim: &Simulator) {
        self.level
            .stage(sim.integrate(self.level.get(), self.derivative_value(sim)));
    }

    fn tock(&self) {
        self.level.commit();
    }

    fn value(&self, _sim: &Simulator) -> f64 {
        self.level.get()
    }
}
