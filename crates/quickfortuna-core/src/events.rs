//! Seeding-progress events and their listener registry.
//!
//! Two events exist: `progress`, fired on every entropy submission while the
//! generator is not yet ready, and `seeded`, fired once when readiness is
//! first reached. Dispatch is synchronous, inside the `add_entropy` call
//! that caused the transition, over a snapshot of the registry: a listener
//! removed during dispatch is still called for the current event and never
//! for later ones.

use std::sync::Arc;

/// An event delivered to registered listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Seeding progress in `[0.0, 1.0]` at the default paranoia level.
    Progress(f64),
    /// The generator became ready; payload is the entropy bits available
    /// (the larger of working strength and pooled strength).
    Seeded(u64),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Progress(_) => EventKind::Progress,
            Self::Seeded(_) => EventKind::Seeded,
        }
    }
}

/// Which event a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Progress,
    Seeded,
}

/// Handle identifying one registered listener; returned by registration and
/// used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Listener registry, one append-only vector per event kind.
pub(crate) struct EventDispatcher {
    next_id: u64,
    progress: Vec<(ListenerId, Callback)>,
    seeded: Vec<(ListenerId, Callback)>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            progress: Vec::new(),
            seeded: Vec::new(),
        }
    }

    pub fn add(&mut self, kind: EventKind, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registry_mut(kind).push((id, callback));
        id
    }

    /// Remove a listener; returns whether it was registered.
    pub fn remove(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let registry = self.registry_mut(kind);
        let before = registry.len();
        registry.retain(|(lid, _)| *lid != id);
        registry.len() != before
    }

    /// Invoke every listener registered for the event's kind.
    pub fn fire(&self, event: &Event) {
        // Snapshot first so registry mutations take effect only afterwards.
        let snapshot: Vec<Callback> = self
            .registry(event.kind())
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    #[cfg(test)]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry(kind).len()
    }

    fn registry(&self, kind: EventKind) -> &Vec<(ListenerId, Callback)> {
        match kind {
            EventKind::Progress => &self.progress,
            EventKind::Seeded => &self.seeded,
        }
    }

    fn registry_mut(&mut self, kind: EventKind) -> &mut Vec<(ListenerId, Callback)> {
        match kind {
            EventKind::Progress => &mut self.progress,
            EventKind::Seeded => &mut self.seeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn listeners_receive_their_kind_only() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let sink = Arc::clone(&hits);
        dispatcher.add(
            EventKind::Seeded,
            Arc::new(move |e| sink.lock().unwrap().push(*e)),
        );

        dispatcher.fire(&Event::Progress(0.5));
        dispatcher.fire(&Event::Seeded(128));

        assert_eq!(*hits.lock().unwrap(), vec![Event::Seeded(128)]);
    }

    #[test]
    fn remove_restores_listener_set() {
        let mut dispatcher = EventDispatcher::new();
        let id = dispatcher.add(EventKind::Progress, Arc::new(|_| {}));
        assert_eq!(dispatcher.listener_count(EventKind::Progress), 1);

        assert!(dispatcher.remove(EventKind::Progress, id));
        assert_eq!(dispatcher.listener_count(EventKind::Progress), 0);

        // a second removal is a no-op
        assert!(!dispatcher.remove(EventKind::Progress, id));
    }

    #[test]
    fn remove_under_wrong_kind_is_a_no_op() {
        let mut dispatcher = EventDispatcher::new();
        let id = dispatcher.add(EventKind::Seeded, Arc::new(|_| {}));
        assert!(!dispatcher.remove(EventKind::Progress, id));
        assert_eq!(dispatcher.listener_count(EventKind::Seeded), 1);
    }

    #[test]
    fn all_listeners_fire_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        for tag in [1, 2, 3] {
            let sink = Arc::clone(&order);
            dispatcher.add(
                EventKind::Progress,
                Arc::new(move |_| sink.lock().unwrap().push(tag)),
            );
        }

        dispatcher.fire(&Event::Progress(1.0));
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }
}
