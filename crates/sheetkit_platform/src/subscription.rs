//! Scoped event subscriptions
//!
//! An [`EventSource`] fans events out to every live [`Subscription`]. Each
//! subscription owns a queue the consumer drains at its own pace; dropping the
//! subscription detaches it, and the source prunes it on the next send.
//!
//! Everything here is single-threaded (`Rc`), matching the UI-thread-only
//! event model of the sheet.
//!
//! ```rust
//! use sheetkit_platform::EventSource;
//!
//! let source = EventSource::<u32>::new();
//! let sub = source.subscribe();
//! source.send(7);
//! assert_eq!(sub.drain(), vec![7]);
//!
//! drop(sub);
//! assert_eq!(source.send(8), 0);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

type Queue<T> = RefCell<VecDeque<T>>;

/// Broadcasts events to subscribers
pub struct EventSource<T> {
    subscribers: RefCell<SmallVec<[Weak<Queue<T>>; 4]>>,
}

impl<T> Default for EventSource<T> {
    fn default() -> Self {
        Self {
            subscribers: RefCell::new(SmallVec::new()),
        }
    }
}

impl<T> fmt::Debug for EventSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T: Clone> EventSource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Subscription<T> {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        self.subscribers.borrow_mut().push(Rc::downgrade(&queue));
        Subscription { queue }
    }

    /// Deliver an event to every live subscriber
    ///
    /// Returns the number of subscribers that received it.
    pub fn send(&self, event: T) -> usize {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|weak| weak.strong_count() > 0);
        for weak in subscribers.iter() {
            if let Some(queue) = weak.upgrade() {
                queue.borrow_mut().push_back(event.clone());
            }
        }
        subscribers.len()
    }
}

impl<T> EventSource<T> {
    /// Number of subscribers still alive
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

/// Receiving end of an [`EventSource`]
///
/// Dropping the subscription unsubscribes.
pub struct Subscription<T> {
    queue: Rc<Queue<T>>,
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}

impl<T> Subscription<T> {
    /// Take the oldest pending event
    pub fn try_next(&self) -> Option<T> {
        self.queue.borrow_mut().pop_front()
    }

    /// Take every pending event, oldest first
    pub fn drain(&self) -> Vec<T> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
