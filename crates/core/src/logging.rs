//! Value recording across a simulation run.

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::entity::Entity;
use crate::event::Event;
use crate::simulator::Simulator;

/// Time-indexed record of every entity's value over a run.
///
/// One entry is appended per recorded instant: the first at `init`, then one
/// per `advance`, in call order. After a full run each series holds
/// `1 + floor((max_time - init_time) / time_step)` values.
///
/// The time axis is a dedicated series rather than a reserved identifier, so
/// an entity named `time` cannot collide with it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Log {
    time: Vec<f64>,
    series: BTreeMap<String, Vec<f64>>,
}

impl Log {
    /// The recorded time axis; `time()[0]` is the initial time.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// The recorded values for one entity, aligned with [`time`](Log::time).
    pub fn series(&self, id: &str) -> Option<&[f64]> {
        self.series.get(id).map(Vec::as_slice)
    }

    /// Identifiers with a recorded series, in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Number of recorded instants.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn clear(&mut self) {
        self.time.clear();
        self.series.clear();
    }

    fn record(&mut self, sim: &Simulator) {
        self.time.push(sim.time());
        for entity in sim.entities() {
            self.series
                .entry(entity.id().to_owned())
                .or_default()
                .push(entity.value(sim));
        }
    }
}

/// A [`Simulator`] that records every entity's value at every step.
///
/// Wraps a simulator and subscribes to its [`Event::Init`] and
/// [`Event::Advance`] events: `init` starts a fresh log with one entry,
/// every `advance` appends one. Because the recording handlers are
/// registered at construction, they observe each step before any handler
/// subscribed later.
pub struct LoggingSimulator {
    sim: Simulator,
    log: Rc<RefCell<Log>>,
}

impl LoggingSimulator {
    /// Wraps a simulator with value recording.
    pub fn new(mut sim: Simulator) -> Self {
        let log = Rc::new(RefCell::new(Log::default()));

        let on_init = Rc::clone(&log);
        sim.on(&[Event::Init], move |sim, _| {
            let mut log = on_init.borrow_mut();
            log.clear();
            log.record(sim);
        });

        let on_advance = Rc::clone(&log);
        sim.on(&[Event::Advance], move |sim, _| {
            on_advance.borrow_mut().record(sim);
        });

        Self { sim, log }
    }

    /// Read access to the recorded log.
    ///
    /// The returned guard must be dropped before the next `init` or
    /// `advance`; recording while a guard is live is a borrow conflict.
    pub fn log(&self) -> Ref<'_, Log> {
        self.log.borrow()
    }

    /// Consumes the wrapper and returns the recorded log.
    #[must_use]
    pub fn into_log(self) -> Log {
        drop(self.sim); // drops the recording handlers and their Rc clones
        Rc::try_unwrap(self.log)
            .map(RefCell::into_inner)
            .unwrap_or_default()
    }

    /// The wrapped simulator.
    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    /// Mutable access to the wrapped simulator, e.g. to subscribe further
    /// handlers.
    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.sim
    }

    /// See [`Simulator::init`].
    pub fn init(&mut self) {
        self.sim.init();
    }

    /// See [`Simulator::advance`].
    pub fn advance(&mut self) {
        self.sim.advance();
    }

    /// See [`Simulator::execute`].
    pub fn execute(&mut self) {
        self.sim.execute();
    }

    /// See [`Simulator::is_complete`].
    pub fn is_complete(&self) -> bool {
        self.sim.is_complete()
    }

    /// See [`Simulator::value`].
    pub fn value(&self, id: &str) -> f64 {
        self.sim.value(id)
    }

    /// See [`Simulator::entity`].
    pub fn entity(&self, id: &str) -> Option<&dyn Entity> {
        self.sim.entity(id)
    }
}
