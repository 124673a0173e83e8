//! Constant-valued entities.

use crate::entity::{Entity, Meta};
use crate::simulator::Simulator;

/// A constant in a System Dynamics model.
///
/// A parameter's value is fixed at construction and never changes during a
/// run. Keeping constants in the entity collection lets formulas resolve them
/// by identifier like any other quantity.
pub struct Parameter {
    id: String,
    meta: Meta,
    value: f64,
}

impl Parameter {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            meta: Meta::default(),
            value,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

impl Entity for Parameter {
    fn id(&self) -> &str {
        &self.id
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn value(&self, _sim: &Simulator) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::simulator::Simulator;

    #[test]
    fn holds_its_configured_value() {
        let mut sim = Simulator::builder()
            .entity(Parameter::new("gravity", 9.81))
            .build();
        sim.init();

        assert_eq!(sim.value("gravity"), 9.81);
        sim.advance();
        assert_eq!(sim.value("gravity"), 9.81);
    }

    #[test]
    fn carries_caller_metadata() {
        let parameter = Parameter::new("bandwidth", 5.0)
            .with_meta(Meta::named("Cognitive Bandwidth").units("Reqs"));

        assert_eq!(parameter.meta().name.as_deref(), Some("Cognitive Bandwidth"));
        assert_eq!(parameter.meta().units.as_deref(), Some("Reqs"));
        assert!(parameter.meta().description.is_none());
    }
}
