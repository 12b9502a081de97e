//! Observable values for the presentation layer
//!
//! A [`Signal`] holds a value and a list of subscribers. Subscribers get the
//! current value when they subscribe and then every distinct value, in
//! order. Setting a value equal to the current one notifies nobody.

use std::fmt;

use crate::sim::RoundPhase;

type Subscriber<T> = Box<dyn FnMut(&T)>;

pub struct Signal<T> {
    value: T,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: Clone + PartialEq> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Register a subscriber; it is called right away with the current value
    pub fn subscribe(&mut self, mut subscriber: impl FnMut(&T) + 'static) {
        subscriber(&self.value);
        self.subscribers.push(Box::new(subscriber));
    }

    /// Store a new value, notifying subscribers if it changed
    pub fn set(&mut self, value: T) {
        if value == self.value {
            return;
        }
        self.value = value;
        for subscriber in &mut self.subscribers {
            subscriber(&self.value);
        }
    }

    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let value = f(&self.value);
        self.set(value);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Everything the HUD and panels listen to
#[derive(Debug)]
pub struct RoundSignals {
    pub score: Signal<u32>,
    /// Seconds remaining
    pub time: Signal<u32>,
    pub final_score: Signal<u32>,
    pub state: Signal<RoundPhase>,
}

impl RoundSignals {
    pub fn new(total_time: u32) -> Self {
        Self {
            score: Signal::new(0),
            time: Signal::new(total_time),
            final_score: Signal::new(0),
            state: Signal::new(RoundPhase::Waiting),
        }
    }

    pub fn on_score_changed(&mut self, f: impl FnMut(&u32) + 'static) {
        self.score.subscribe(f);
    }

    pub fn on_time_changed(&mut self, f: impl FnMut(&u32) + 'static) {
        self.time.subscribe(f);
    }

    pub fn on_final_score_set(&mut self, f: impl FnMut(&u32) + 'static) {
        self.final_score.subscribe(f);
    }

    pub fn on_state_changed(&mut self, f: impl FnMut(&RoundPhase) + 'static) {
        self.state.subscribe(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: &T| sink.borrow_mut().push(value.clone()))
    }

    #[test]
    fn test_subscribe_replays_current_value() {
        let mut signal = Signal::new(7u32);
        let (seen, subscriber) = recorder();
        signal.subscribe(subscriber);
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn test_only_distinct_values_are_emitted() {
        let mut signal = Signal::new(0u32);
        let (seen, subscriber) = recorder();
        signal.subscribe(subscriber);

        signal.set(1);
        signal.set(1);
        signal.set(3);
        signal.update(|v| v + 2);
        signal.set(5);
        assert_eq!(*seen.borrow(), vec![0, 1, 3, 5]);
        assert_eq!(signal.get(), 5);
    }

    #[test]
    fn test_every_subscriber_is_notified() {
        let mut signals = RoundSignals::new(30);
        let (first, a) = recorder();
        let (second, b) = recorder();
        signals.on_time_changed(a);
        signals.on_time_changed(b);

        signals.time.set(29);
        assert_eq!(*first.borrow(), vec![30, 29]);
        assert_eq!(*second.borrow(), vec![30, 29]);
        assert_eq!(signals.time.subscriber_count(), 2);
    }
}
