use std::{
    cell::RefCell,
    mem::take,
    rc::{Rc, Weak},
};

use derive_ex::derive_ex;
use slabmap::SlabMap;


/// Handle to a registered listener. The listener is removed when this is dropped.
#[derive(Default)]
#[must_use]
pub struct Subscription(RawSubscription);

impl Subscription {
    pub fn empty() -> Self {
        Subscription(RawSubscription::Empty)
    }
    pub fn from_fn(f: impl FnOnce() + 'static) -> Self {
        Subscription(RawSubscription::Fn(Box::new(f)))
    }
    fn from_listener(listeners: Weak<RefCell<SlabMap<Listener>>>, key: usize) -> Self {
        Subscription(RawSubscription::Listener { listeners, key })
    }

    /// Keeps the listener registered for as long as its source lives.
    pub fn detach(mut self) {
        self.0 = RawSubscription::Empty;
    }
}
impl Drop for Subscription {
    fn drop(&mut self) {
        match take(&mut self.0) {
            RawSubscription::Empty => {}
            RawSubscription::Fn(f) => f(),
            RawSubscription::Listener { listeners, key } => {
                if let Some(listeners) = listeners.upgrade() {
                    listeners.borrow_mut().remove(key);
                }
            }
        }
    }
}

#[derive(Default)]
enum RawSubscription {
    #[default]
    Empty,
    Fn(Box<dyn FnOnce() + 'static>),
    Listener {
        listeners: Weak<RefCell<SlabMap<Listener>>>,
        key: usize,
    },
}

type Listener = Rc<dyn Fn()>;

/// Set of change listeners owned by a store.
///
/// Listeners are invoked outside of the internal borrow, so a listener may
/// read the store, subscribe, or drop its own [`Subscription`] while being called.
#[derive_ex(Default)]
#[default(Self::new())]
pub struct Listeners(Rc<RefCell<SlabMap<Listener>>>);

impl Listeners {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SlabMap::new())))
    }

    pub fn subscribe(&self, f: impl Fn() + 'static) -> Subscription {
        let key = self.0.borrow_mut().insert(Rc::new(f));
        Subscription::from_listener(Rc::downgrade(&self.0), key)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn notify(&self) {
        let listeners: Vec<Listener> = {
            let mut map = self.0.borrow_mut();
            map.optimize();
            map.values().cloned().collect()
        };
        for listener in listeners {
            listener();
        }
    }
}
