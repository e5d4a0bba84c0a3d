//! Publish/subscribe registry for store state.
//!
//! # Responsibility
//! - Hold observers of the whole state or of a selected slice.
//! - Deliver each published state to every active observer synchronously.
//!
//! # Invariants
//! - Slice observers are called only when the selected value changes.
//! - Delivery order follows subscription order.
//! - An unsubscribed observer is dropped and never called again.

use super::StoreState;
use std::collections::BTreeMap;

/// Handle returned by `subscribe*`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

trait Subscriber {
    fn deliver(&mut self, state: &StoreState);
}

struct WholeState<L> {
    listener: L,
}

impl<L: FnMut(&StoreState)> Subscriber for WholeState<L> {
    fn deliver(&mut self, state: &StoreState) {
        (self.listener)(state);
    }
}

struct Slice<T, F, L> {
    selector: F,
    listener: L,
    last: T,
}

impl<T, F, L> Subscriber for Slice<T, F, L>
where
    T: PartialEq,
    F: Fn(&StoreState) -> T,
    L: FnMut(&T),
{
    fn deliver(&mut self, state: &StoreState) {
        let next = (self.selector)(state);
        if next != self.last {
            (self.listener)(&next);
            self.last = next;
        }
    }
}

#[derive(Default)]
pub struct Subscriptions {
    next_id: u64,
    entries: BTreeMap<SubscriptionId, Box<dyn Subscriber>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a slice observer; `current` primes the change detector.
    pub fn subscribe<T, F, L>(&mut self, current: &StoreState, selector: F, listener: L) -> SubscriptionId
    where
        T: PartialEq + 'static,
        F: Fn(&StoreState) -> T + 'static,
        L: FnMut(&T) + 'static,
    {
        let last = selector(current);
        self.insert(Box::new(Slice {
            selector,
            listener,
            last,
        }))
    }

    /// Registers an observer of every published state.
    pub fn subscribe_all<L>(&mut self, listener: L) -> SubscriptionId
    where
        L: FnMut(&StoreState) + 'static,
    {
        self.insert(Box::new(WholeState { listener }))
    }

    /// Removes one observer. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn publish(&mut self, state: &StoreState) {
        for subscriber in self.entries.values_mut() {
            subscriber.deliver(state);
        }
    }

    fn insert(&mut self, subscriber: Box<dyn Subscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, subscriber);
        id
    }
}
