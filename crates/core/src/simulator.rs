//! The simulation orchestrator.
//!
//! A [`Simulator`] owns an ordered collection of entities and advances them
//! through synchronized time steps:
//!
//! ```text
//! init():    time = init_time; entity.init() for each; fire Init
//! advance(): entity.tick() for each   (stage from committed state)
//!            entity.tock() for each   (commit staged state)
//!            time += time_step; fire Advance; fire Complete when done
//! ```
//!
//! The two passes of `advance` are never interleaved: every `tick` completes
//! before the first `tock` runs, so no entity can observe another's
//! mid-step state. This ordering is the engine's whole simultaneity
//! discipline. Execution is single-threaded and synchronous; there is
//! nothing to lock.
//!
//! Entities pull the values they need from the simulator by identifier
//! ([`Simulator::value`]); the registry behind the lookup is built once at
//! construction.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::{debug, info, trace, warn};

use crate::entity::Entity;
use crate::error::Error;
use crate::event::{Event, HandlerId, Handlers};
use crate::integrate::{ExplicitEuler, Integrator};

/// Drives a fixed collection of entities through a simulation run.
///
/// Built with [`Simulator::builder`]. The entity collection, its order, and
/// the identifier registry are fixed for the lifetime of the simulator; the
/// simulator neither creates nor destroys entities.
///
/// A simulator is single-threaded by construction and is not `Send` or
/// `Sync`; nothing here is safe to share across threads.
pub struct Simulator {
    entities: Vec<Box<dyn Entity>>,
    index: HashMap<String, usize>,
    method: Box<dyn Integrator>,
    init_time: f64,
    max_time: f64,
    time_step: f64,
    time: f64,
    resolve_depth: Cell<usize>,
    handlers: RefCell<Handlers>,
    complete_when: Option<Box<dyn Fn(&Simulator) -> bool>>,
}

impl Simulator {
    /// Starts configuring a simulator.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Current simulated time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Time established by `init`.
    pub fn init_time(&self) -> f64 {
        self.init_time
    }

    /// Time at which the default completion predicate holds.
    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    /// Duration of one step.
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// The entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> {
        self.entities.iter().map(|entity| &**entity)
    }

    /// Looks up an entity by identifier.
    ///
    /// When several entities share an identifier, the first registered one
    /// wins (construction logged a warning for the rest).
    pub fn entity(&self, id: &str) -> Option<&dyn Entity> {
        self.index.get(id).map(|&i| self.entities[i].as_ref())
    }

    /// Resolves the current value of the entity with the given identifier.
    ///
    /// Returns [`Error::UnknownEntity`] when no entity matches.
    ///
    /// # Panics
    ///
    /// Panics if resolution recurses through a cycle of flow formulas; such
    /// a model has no well-defined value order and cannot run.
    pub fn try_value(&self, id: &str) -> Result<f64, Error> {
        let entity = self
            .entity(id)
            .ok_or_else(|| Error::UnknownEntity(id.to_owned()))?;

        // A pull chain through acyclic formulas can be at most one frame per
        // entity deep; anything deeper must have revisited an entity.
        let depth = self.resolve_depth.get() + 1;
        if depth > self.entities.len() {
            self.resolve_depth.set(0);
            panic!("cyclic reference detected while resolving entity `{id}`");
        }
        self.resolve_depth.set(depth);
        let value = entity.value(self);
        self.resolve_depth.set(depth - 1);
        Ok(value)
    }

    /// Resolves the current value of the entity with the given identifier,
    /// or NaN when no entity matches.
    ///
    /// This is the lookup model formulas use. An unknown identifier is
    /// logged and poisons any arithmetic built on it with NaN rather than
    /// aborting the run; use [`try_value`](Simulator::try_value) to handle
    /// the failure instead.
    ///
    /// # Panics
    ///
    /// Panics if resolution recurses through a cycle of flow formulas.
    pub fn value(&self, id: &str) -> f64 {
        match self.try_value(id) {
            Ok(value) => value,
            Err(_) => {
                warn!(id, "reference to unknown entity resolves to NaN");
                f64::NAN
            }
        }
    }

    /// Integrates one step with the active method and the configured step
    /// size. Stocks call this from `tick`.
    pub fn integrate(&self, value: f64, derivative: f64) -> f64 {
        self.method.integrate(value, derivative, self.time_step)
    }

    /// Whether the run has reached its end condition.
    ///
    /// Defaults to `time >= max_time`; a predicate configured with
    /// [`Builder::complete_when`] replaces the default entirely.
    pub fn is_complete(&self) -> bool {
        match &self.complete_when {
            Some(predicate) => predicate(self),
            None => self.time >= self.max_time,
        }
    }

    /// Initializes the run: sets `time = init_time`, initializes every
    /// entity in registration order, then fires [`Event::Init`].
    pub fn init(&mut self) {
        self.time = self.init_time;
        for entity in &self.entities {
            entity.init(self);
        }
        info!(time = self.time, "simulation initialized");
        self.trigger(Event::Init);
    }

    /// Advances the run by one time step.
    ///
    /// Does nothing when the run is already complete. Otherwise ticks every
    /// entity, tocks every entity, advances time, and fires
    /// [`Event::Advance`], plus [`Event::Complete`] if the end condition
    /// now holds, so `Complete` fires exactly once per run.
    pub fn advance(&mut self) {
        if self.is_complete() {
            return;
        }
        for entity in &self.entities {
            entity.tick(self);
        }
        for entity in &self.entities {
            entity.tock();
        }
        self.time += self.time_step;
        trace!(time = self.time, "advanced one step");
        self.trigger(Event::Advance);
        if self.is_complete() {
            debug!(time = self.time, "simulation complete");
            self.trigger(Event::Complete);
        }
    }

    /// Runs the simulation to completion: `init`, then `advance` until the
    /// end condition holds.
    ///
    /// A run whose completion predicate never holds loops forever; the
    /// engine has no cancellation or timeout semantics.
    pub fn execute(&mut self) {
        self.init();
        while !self.is_complete() {
            self.advance();
        }
    }

    /// Subscribes a handler to one or more events.
    ///
    /// Handlers run synchronously, in subscription order, before the
    /// triggering `init`/`advance` call returns; each receives the simulator
    /// and the current simulated time.
    pub fn on(
        &mut self,
        events: &[Event],
        handler: impl FnMut(&Simulator, f64) + 'static,
    ) -> HandlerId {
        self.handlers.get_mut().subscribe(events, Box::new(handler))
    }

    /// Removes the subscription identified by `id`. Returns `false` when the
    /// subscription no longer exists.
    pub fn off(&mut self, id: HandlerId) -> bool {
        self.handlers.get_mut().unsubscribe(id)
    }

    /// Removes every handler subscribed to the given event.
    pub fn off_all(&mut self, event: Event) {
        self.handlers.get_mut().clear(event);
    }

    fn trigger(&self, event: Event) {
        let mut handlers = self.handlers.borrow_mut();
        for handler in handlers.iter_mut(event) {
            handler(self, self.time);
        }
    }
}

/// Configures and builds a [`Simulator`].
///
/// Defaults: `init_time = 0`, `max_time = 1`, `time_step = 1`, explicit
/// Euler integration, completion at `time >= max_time`.
pub struct Builder {
    entities: Vec<Box<dyn Entity>>,
    method: Box<dyn Integrator>,
    init_time: f64,
    max_time: f64,
    time_step: f64,
    complete_when: Option<Box<dyn Fn(&Simulator) -> bool>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            method: Box::new(ExplicitEuler),
            init_time: 0.0,
            max_time: 1.0,
            time_step: 1.0,
            complete_when: None,
        }
    }
}

impl Builder {
    /// Appends one entity to the collection. Order is significant only for
    /// per-step call order and the log layout, never for step results.
    #[must_use]
    pub fn entity(mut self, entity: impl Entity + 'static) -> Self {
        self.entities.push(Box::new(entity));
        self
    }

    /// Appends a batch of already-boxed entities, as produced by model
    /// constructors.
    #[must_use]
    pub fn entities(mut self, entities: Vec<Box<dyn Entity>>) -> Self {
        self.entities.extend(entities);
        self
    }

    #[must_use]
    pub fn init_time(mut self, init_time: f64) -> Self {
        self.init_time = init_time;
        self
    }

    #[must_use]
    pub fn max_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }

    #[must_use]
    pub fn time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Replaces the integration method (default explicit Euler).
    #[must_use]
    pub fn method(mut self, method: impl Integrator + 'static) -> Self {
        self.method = Box::new(method);
        self
    }

    /// Replaces the completion predicate (default `time >= max_time`).
    #[must_use]
    pub fn complete_when(mut self, predicate: impl Fn(&Simulator) -> bool + 'static) -> Self {
        self.complete_when = Some(Box::new(predicate));
        self
    }

    /// Builds the simulator and its identifier registry.
    ///
    /// Duplicate identifiers are tolerated (lookups resolve to the first
    /// registration) but logged, since they usually indicate a model bug.
    ///
    /// # Panics
    ///
    /// Panics if `time_step` is not strictly positive.
    #[must_use]
    pub fn build(self) -> Simulator {
        assert!(
            self.time_step > 0.0,
            "time step must be strictly positive, got {}",
            self.time_step
        );

        let mut index = HashMap::with_capacity(self.entities.len());
        for (i, entity) in self.entities.iter().enumerate() {
            if index.contains_key(entity.id()) {
                warn!(id = entity.id(), "duplicate entity id; first registration wins");
            } else {
                index.insert(entity.id().to_owned(), i);
            }
        }

        Simulator {
            entities: self.entities,
            index,
            method: self.method,
            init_time: self.init_time,
            max_time: self.max_time,
            time_step: self.time_step,
            time: self.init_time,
            resolve_depth: Cell::new(0),
            handlers: RefCell::new(Handlers::default()),
            complete_when: self.complete_when,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use approx::assert_relative_eq;

    use crate::entity::flow::Flow;
    use crate::entity::parameter::Parameter;
    use crate::entity::stock::Stock;

    // --- Test fixtures ---

    /// Stepping rule that lands on the midpoint of the Euler update, to show
    /// the integration seam.
    struct HalfEuler;

    impl Integrator for HalfEuler {
        fn integrate(&self, value: f64, derivative: f64, dt: f64) -> f64 {
            value + derivative * dt / 2.0
        }
    }

    fn draining_tank() -> Simulator {
        Simulator::builder()
            .entity(Stock::new("tank").init_value(10.0).derivative(|_| -1.0))
            .init_time(0.0)
            .max_time(5.0)
            .time_step(1.0)
            .build()
    }

    // --- Tests ---

    #[test]
    fn execute_runs_init_through_completion() {
        let mut sim = draining_tank();
        sim.execute();

        assert_eq!(sim.time(), 5.0);
        assert_eq!(sim.value("tank"), 5.0);
        assert!(sim.is_complete());
    }

    #[test]
    fn advance_after_completion_is_a_no_op() {
        let mut sim = draining_tank();
        sim.execute();

        sim.advance();
        sim.advance();

        assert_eq!(sim.time(), 5.0);
        assert_eq!(sim.value("tank"), 5.0);
    }

    #[test]
    fn complete_fires_exactly_once() {
        let mut sim = draining_tank();
        let completions = Rc::new(Cell::new(0));
        let seen = Rc::clone(&completions);
        sim.on(&[Event::Complete], move |_, _| seen.set(seen.get() + 1));

        sim.execute();
        sim.advance();

        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn complete_carries_the_completing_time() {
        let mut sim = draining_tank();
        let at = Rc::new(Cell::new(f64::NAN));
        let seen = Rc::clone(&at);
        sim.on(&[Event::Complete], move |_, time| seen.set(time));

        sim.execute();

        assert_eq!(at.get(), 5.0);
    }

    #[test]
    fn handlers_receive_init_and_advance_times() {
        let mut sim = Simulator::builder()
            .init_time(3.0)
            .max_time(5.0)
            .build();
        let times = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&times);
        sim.on(&[Event::Init, Event::Advance], move |_, time| {
            seen.borrow_mut().push(time);
        });

        sim.execute();

        assert_eq!(*times.borrow(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn removed_handler_is_not_invoked_again() {
        let mut sim = draining_tank();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let handler = sim.on(&[Event::Advance], move |_, _| seen.set(seen.get() + 1));

        sim.init();
        sim.advance();
        assert!(sim.off(handler));
        sim.advance();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn off_all_clears_every_advance_handler() {
        let mut sim = draining_tank();
        let calls = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let seen = Rc::clone(&calls);
            sim.on(&[Event::Advance], move |_, _| seen.set(seen.get() + 1));
        }

        sim.init();
        sim.off_all(Event::Advance);
        sim.execute();

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn flows_resolve_immediately_after_init() {
        let mut sim = Simulator::builder()
            .entity(Parameter::new("a", 2.0))
            .entity(Parameter::new("b", 3.0))
            .entity(Flow::new("sum", |sim| sim.value("a") + sim.value("b")))
            .max_time(3.0)
            .build();
        sim.init();
        assert_eq!(sim.value("sum"), 5.0);

        while !sim.is_complete() {
            sim.advance();
            assert_eq!(sim.value("sum"), 5.0);
        }
    }

    #[test]
    fn unknown_reference_resolves_to_nan() {
        let sim = Simulator::builder().build();

        assert!(sim.value("missing").is_nan());
        assert_eq!(
            sim.try_value("missing"),
            Err(Error::UnknownEntity("missing".into()))
        );
        assert!(sim.entity("missing").is_none());
    }

    #[test]
    fn nan_poisons_dependent_formulas() {
        let mut sim = Simulator::builder()
            .entity(Flow::new("broken", |sim| sim.value("missing") * 2.0))
            .build();
        sim.init();

        assert!(sim.value("broken").is_nan());
    }

    #[test]
    #[should_panic(expected = "cyclic reference detected")]
    fn mutually_recursive_flows_are_detected() {
        let sim = Simulator::builder()
            .entity(Flow::new("chicken", |sim| sim.value("egg") + 1.0))
            .entity(Flow::new("egg", |sim| sim.value("chicken") + 1.0))
            .build();

        let _ = sim.value("chicken");
    }

    #[test]
    fn duplicate_ids_resolve_to_first_registration() {
        let mut sim = Simulator::builder()
            .entity(Parameter::new("p", 1.0))
            .entity(Parameter::new("p", 2.0))
            .build();
        sim.init();

        assert_eq!(sim.value("p"), 1.0);
    }

    #[test]
    fn substituted_method_drives_every_stock() {
        let mut sim = Simulator::builder()
            .entity(Stock::new("tank").init_value(10.0).derivative(|_| -1.0))
            .max_time(1.0)
            .method(HalfEuler)
            .build();
        sim.execute();

        assert_relative_eq!(sim.value("tank"), 9.5);
    }

    #[test]
    fn custom_completion_predicate_replaces_the_default() {
        let mut sim = Simulator::builder()
            .entity(Stock::new("tank").init_value(10.0).derivative(|_| -1.0))
            .max_time(1000.0)
            .complete_when(|sim| sim.value("tank") <= 7.0)
            .build();
        sim.execute();

        assert_eq!(sim.time(), 3.0);
        assert_eq!(sim.value("tank"), 7.0);
    }

    #[test]
    fn fractional_steps_accumulate_time() {
        let mut sim = Simulator::builder()
            .init_time(0.0)
            .max_time(100.0)
            .time_step(0.25)
            .build();
        let steps = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&steps);
        sim.on(&[Event::Advance], move |_, _| seen.set(seen.get() + 1));

        sim.execute();

        assert_eq!(steps.get(), 400);
        assert_relative_eq!(sim.time(), 100.0);
    }

    #[test]
    #[should_panic(expected = "time step must be strictly positive")]
    fn non_positive_time_step_is_rejected() {
        let _ = Simulator::builder().time_step(0.0).build();
    }
}
