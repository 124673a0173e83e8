//! Derived, stateless quantities.

use crate::entity::{generate_id, Entity, Meta, ValueFn};
use crate::simulator::Simulator;

/// A flow in a System Dynamics model: a pure function of the current
/// simulation state.
///
/// Flows persist nothing across steps. The formula is re-evaluated on every
/// reference, so a flow referenced by several other entities within one step
/// is computed once per reference; referential transparency is part of the
/// contract, which is why the formula is a [`Fn`] closure.
///
/// A flow whose formula (directly or through other flows) references itself
/// has no well-defined value; resolving it trips the simulator's cycle
/// guard. See [`Simulator::value`].
pub struct Flow {
    id: String,
    meta: Meta,
    formula: ValueFn,
}

impl Flow {
    pub fn new(id: impl Into<String>, formula: impl Fn(&Simulator) -> f64 + 'static) -> Self {
        Self {
            id: id.into(),
            meta: Meta::default(),
            formula: Box::new(formula),
        }
    }

    /// A flow with a generated identifier, for quantities only ever read
    /// through the log or by position.
    pub fn anonymous(formula: impl Fn(&Simulator) -> f64 + 'static) -> Self {
        Self::new(generate_id(), formula)
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

impl Entity for Flow {
    fn id(&self) -> &str {
        &self.id
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn value(&self, sim: &Simulator) -> f64 {
        (self.formula)(sim)
    }
}
