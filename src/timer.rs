//! Executor-independent sleep.
//!
//! Deadlines are kept in one process-wide queue served by a single worker thread,
//! which wakes each pending future once its deadline has passed.

use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::{Condvar, LazyLock, Mutex, MutexGuard},
    task::{Context, Poll, Waker},
    time::{Duration, Instant},
};

use slabmap::SlabMap;


static SLEEPERS: LazyLock<Sleepers> = LazyLock::new(|| Sleepers {
    queue: Mutex::new(SleepQueue::new()),
    condvar: Condvar::new(),
});

struct Sleepers {
    queue: Mutex<SleepQueue>,
    condvar: Condvar,
}
impl Sleepers {
    fn lock(&self) -> MutexGuard<'_, SleepQueue> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn run_worker(&self) {
        let mut wakes = Vec::new();
        let mut queue = self.lock();
        loop {
            let now = Instant::now();
            queue.take_expired(now, &mut wakes);
            if !wakes.is_empty() {
                drop(queue);
                for waker in wakes.drain(..) {
                    waker.wake();
                }
                queue = self.lock();
                continue;
            }
            queue = match queue.next_deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(now);
                    self.condvar
                        .wait_timeout(queue, wait)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
                None => self.condvar.wait(queue).unwrap_or_else(|e| e.into_inner()),
            };
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    deadline: Instant,
    id: usize,
}

struct SleepQueue {
    deadlines: BTreeMap<Key, ()>,
    wakers: SlabMap<Option<Waker>>,
    worker_running: bool,
}

impl SleepQueue {
    fn new() -> Self {
        Self {
            deadlines: BTreeMap::new(),
            wakers: SlabMap::new(),
            worker_running: false,
        }
    }

    fn insert(&mut self, deadline: Instant, waker: Waker) -> usize {
        if !self.worker_running {
            self.worker_running = true;
            std::thread::spawn(|| SLEEPERS.run_worker());
        }
        let id = self.wakers.insert(Some(waker));
        let key = Key { deadline, id };
        let is_earliest = self.deadlines.first_key_value().is_none_or(|(k, _)| key < *k);
        self.deadlines.insert(key, ());
        if is_earliest {
            SLEEPERS.condvar.notify_one();
        }
        id
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.first_key_value().map(|(k, _)| k.deadline)
    }

    fn take_expired(&mut self, now: Instant, wakes: &mut Vec<Waker>) {
        while let Some(entry) = self.deadlines.first_entry() {
            if entry.key().deadline > now {
                break;
            }
            let id = entry.key().id;
            entry.remove();
            if let Some(waker) = self.wakers[id].take() {
                wakes.push(waker);
            }
        }
    }

    /// `Pending` while the deadline is queued, `Ready` once the worker has fired it.
    fn poll(&mut self, id: usize, cx: &Context) -> Poll<()> {
        match &mut self.wakers[id] {
            Some(waker) => {
                if !waker.will_wake(cx.waker()) {
                    *waker = cx.waker().clone();
                }
                Poll::Pending
            }
            None => {
                self.wakers.remove(id);
                Poll::Ready(())
            }
        }
    }

    fn cancel(&mut self, id: usize, deadline: Instant) {
        self.wakers.remove(id);
        self.deadlines.remove(&Key { deadline, id });
    }
}

struct Sleep {
    deadline: Instant,
    id: Option<usize>,
}

impl Future for Sleep {
    type Output = ();
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(id) = this.id else {
            if this.deadline <= Instant::now() {
                return Poll::Ready(());
            }
            this.id = Some(SLEEPERS.lock().insert(this.deadline, cx.waker().clone()));
            return Poll::Pending;
        };
        let poll = SLEEPERS.lock().poll(id, cx);
        if poll.is_ready() {
            this.id = None;
            this.deadline = Instant::now();
        }
        poll
    }
}
impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            SLEEPERS.lock().cancel(id, self.deadline);
        }
    }
}

/// Completes after `duration` has elapsed.
pub fn sleep(duration: Duration) -> impl Future<Output = ()> {
    sleep_until(Instant::now() + duration)
}

/// Completes once `deadline` has passed.
pub fn sleep_until(deadline: Instant) -> impl Future<Output = ()> {
    Sleep { deadline, id: None }
}
