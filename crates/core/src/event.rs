//! Typed simulation events and handler bookkeeping.
//!
//! A [`Simulator`] fires a closed set of [`Event`]s as it runs. Handlers are
//! plain closures invoked synchronously, in subscription order, with a shared
//! view of the simulator and the current simulated time. Subscribing returns
//! a [`HandlerId`] token that is later used to unsubscribe.
//!
//! [`Simulator`]: crate::simulator::Simulator

use crate::simulator::Simulator;

/// An event fired by a [`Simulator`] during execution.
///
/// [`Simulator`]: crate::simulator::Simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// Fired once per run, after every entity has been initialized.
    Init,
    /// Fired after each completed time step.
    Advance,
    /// Fired once per run, on the step whose resulting time first satisfies
    /// the completion predicate.
    Complete,
}

/// A callback registered for one or more [`Event`]s.
///
/// Handlers receive the simulator (read access only) and the current
/// simulated time.
pub type Handler = Box<dyn FnMut(&Simulator, f64)>;

/// Token identifying one subscription, returned by `Simulator::on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Entry {
    id: HandlerId,
    events: Vec<Event>,
    callback: Handler,
}

/// Ordered handler registry. One entry per subscription; an entry subscribed
/// to several events is invoked once per matching event.
#[derive(Default)]
pub(crate) struct Handlers {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Handlers {
    pub(crate) fn subscribe(&mut self, events: &[Event], callback: Handler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            events: events.to_vec(),
            callback,
        });
        id
    }

    /// Removes the subscription with the given token. Returns `false` if no
    /// such subscription exists (already removed, or never issued here).
    pub(crate) fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Drops the given event from every subscription; subscriptions left with
    /// no events are removed entirely.
    pub(crate) fn clear(&mut self, event: Event) {
        for entry in &mut self.entries {
            entry.events.retain(|&e| e != event);
        }
        self.entries.retain(|entry| !entry.events.is_empty());
    }

    /// Handlers subscribed to `event`, in subscription order.
    pub(crate) fn iter_mut(&mut self, event: Event) -> impl Iterator<Item = &mut Handler> {
        self.entries
            .iter_mut()
            .filter(move |entry| entry.events.contains(&event))
            .map(|entry| &mut entry.callback)
    }
}
