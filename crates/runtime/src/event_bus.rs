use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::frame::Frame;

/// Stable, human-readable name for an event variant.
///
/// Used for log fields and for tooling that prints the event stream.
pub trait EventKind {
    fn kind(&self) -> &'static str;
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// An emitted event stamped with the frame it was emitted in.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<E> {
    pub frame_index: u64,
    pub event: E,
}

type Listener<E> = Box<dyn FnMut(&E)>;

/// Number of events the log keeps unless configured otherwise.
pub const DEFAULT_LOG_CAPACITY: usize = 4096;

/// Typed notification stream.
///
/// Listeners are called synchronously, in subscription order, for every
/// emitted event. Events are also appended to a bounded log: once it holds
/// `log_capacity` entries the oldest one is evicted for each new event.
/// Consumers that need every event either subscribe or [`drain`](Self::drain)
/// at least once per `log_capacity` emissions. A capacity of zero disables
/// the log entirely.
pub struct EventBus<E> {
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    events: VecDeque<Recorded<E>>,
    log_capacity: usize,
    evicted: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("events", &self.events)
            .field("log_capacity", &self.log_capacity)
            .field("evicted", &self.evicted)
            .finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_log_capacity(log_capacity: usize) -> Self {
        Self {
            next_subscription: 0,
            listeners: Vec::new(),
            events: VecDeque::new(),
            log_capacity,
            evicted: 0,
        }
    }

    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }

    /// Events dropped from the log since the bus was created.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> &VecDeque<Recorded<E>> {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Recorded<E>> {
        self.events.drain(..).collect()
    }
}

impl<E: EventKind> EventBus<E> {
    pub fn emit(&mut self, frame: Frame, event: E) {
        debug!(kind = event.kind(), frame = frame.index, "emit");
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        if self.log_capacity == 0 {
            return;
        }
        if self.events.len() >= self.log_capacity {
            self.events.pop_front();
            self.evicted += 1;
        }
        self.events.push_back(Recorded {
            frame_index: frame.index,
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::{EventBus, EventKind, Recorded};
    use crate::frame::Frame;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        A,
        B(u32),
    }

    impl EventKind for Ping {
        fn kind(&self) -> &'static str {
            match self {
                Ping::A => "a",
                Ping::B(_) => "b",
            }
        }
    }

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        bus.emit(Frame::new(2, 0.1), Ping::A);
        assert_eq!(
            bus.events(),
            &[Recorded {
                frame_index: 2,
                event: Ping::A
            }]
        );
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Frame::new(0, 1.0), Ping::B(7));
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }

    #[test]
    fn listeners_see_events_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let first = Rc::clone(&seen);
        bus.subscribe(move |e: &Ping| first.borrow_mut().push(format!("1:{}", e.kind())));
        let second = Rc::clone(&seen);
        bus.subscribe(move |e: &Ping| second.borrow_mut().push(format!("2:{}", e.kind())));

        bus.emit(Frame::new(0, 1.0), Ping::A);
        bus.emit(Frame::new(0, 1.0), Ping::B(1));

        assert_eq!(*seen.borrow(), vec!["1:a", "2:a", "1:b", "2:b"]);
    }

    #[test]
    fn log_keeps_only_the_newest_events() {
        let mut bus = EventBus::with_log_capacity(3);
        for i in 0..10 {
            bus.emit(Frame::new(i, 1.0), Ping::B(i as u32));
        }
        let kept: Vec<Ping> = bus.events().iter().map(|r| r.event.clone()).collect();
        assert_eq!(kept, vec![Ping::B(7), Ping::B(8), Ping::B(9)]);
        assert_eq!(bus.evicted(), 7);
    }

    #[test]
    fn zero_capacity_only_notifies_listeners() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::with_log_capacity(0);
        let c = Rc::clone(&count);
        bus.subscribe(move |_: &Ping| *c.borrow_mut() += 1);

        bus.emit(Frame::new(0, 1.0), Ping::A);
        bus.emit(Frame::new(1, 1.0), Ping::A);

        assert_eq!(*count.borrow(), 2);
        assert!(bus.events().is_empty());
        assert_eq!(bus.evicted(), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_: &Ping| *c.borrow_mut() += 1);

        bus.emit(Frame::new(0, 1.0), Ping::A);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(Frame::new(1, 1.0), Ping::A);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.events().len(), 2);
    }
}
