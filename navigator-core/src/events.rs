//! Typed navigator events and an ordered subscriber list.
//!
//! # Examples
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use navigator_core::{EventBus, NavigatorEvent, Sector};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let mut bus = EventBus::new();
//! bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));
//!
//! bus.publish(&NavigatorEvent::SectorSelected(Sector::new("tourism")));
//! assert_eq!(seen.borrow().len(), 1);
//! ```

use std::fmt;

use crate::{GovernorateId, Sector, UserProfile};

/// Everything the navigator reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorEvent {
    /// A user completed sign-in.
    SignedIn(UserProfile),
    /// The current user signed out.
    SignedOut,
    /// A sector was chosen from the sector picker.
    SectorSelected(Sector),
    /// A governorate shape was clicked on the map.
    FeatureClicked(GovernorateId),
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&NavigatorEvent)>;

/// Delivers events to subscribers in subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Register `subscriber` and return its handle.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&NavigatorEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber in order.
    pub fn publish(&mut self, event: &NavigatorEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(event);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Report whether nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(
        log: &Rc<RefCell<Vec<String>>>,
        tag: &'static str,
    ) -> impl FnMut(&NavigatorEvent) + use<> {
        let sink = Rc::clone(log);
        move |event| sink.borrow_mut().push(format!("{tag}:{event:?}"))
    }

    #[test]
    fn delivers_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(recorder(&log, "a"));
        bus.subscribe(recorder(&log, "b"));

        bus.publish(&NavigatorEvent::SignedOut);

        assert_eq!(*log.borrow(), vec!["a:SignedOut", "b:SignedOut"]);
    }

    #[test]
    fn unsubscribed_handlers_stop_receiving() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let first = bus.subscribe(recorder(&log, "a"));
        bus.subscribe(recorder(&log, "b"));

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.publish(&NavigatorEvent::FeatureClicked(GovernorateId::new(4)));

        assert_eq!(bus.len(), 1);
        assert_eq!(*log.borrow(), vec!["b:FeatureClicked(GovernorateId(4))"]);
    }
}
