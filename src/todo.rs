use std::{
    cell::Cell,
    time::{SystemTime, UNIX_EPOCH},
};

use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

use crate::Subscription;

#[cfg(test)]
mod tests;

#[derive(
    Clone, Copy, Debug, Display, FromStr, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display("{0}")]
#[serde(transparent)]
pub struct TodoId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub done: bool,
}

impl Todo {
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            done: false,
        }
    }
}

/// How `add_todo` allocates ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Milliseconds since the UNIX epoch. Two adds within one millisecond share an id.
    #[default]
    Clock,
    /// Strictly increasing counter starting at 1.
    Monotonic,
}

pub struct IdSource {
    policy: IdPolicy,
    next: Cell<u64>,
}

impl IdSource {
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            policy,
            next: Cell::new(1),
        }
    }
    pub fn policy(&self) -> IdPolicy {
        self.policy
    }
    pub fn next_id(&self) -> TodoId {
        match self.policy {
            IdPolicy::Clock => TodoId(clock_millis()),
            IdPolicy::Monotonic => {
                let id = self.next.get();
                self.next.set(id + 1);
                TodoId(id)
            }
        }
    }
    /// Records an id chosen by the caller so later generated ids skip past it.
    pub fn observe(&self, id: TodoId) {
        if self.policy == IdPolicy::Monotonic && id.0 >= self.next.get() {
            self.next.set(id.0.saturating_add(1));
        }
    }
    pub fn reset(&self) {
        self.next.set(1);
    }
}

fn clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Operations shared by every todo store.
///
/// Both implementations must produce the same list for the same sequence of calls
/// when ids are supplied through [`add_todo_with_id`](Self::add_todo_with_id).
pub trait TodoStore {
    /// Current list, in insertion order.
    fn todos(&self) -> Vec<Todo>;

    /// Appends a todo with a freshly allocated id. Empty text is accepted.
    fn add_todo(&self, text: &str);

    /// Appends a todo with a caller-supplied id.
    ///
    /// The id is not checked against the list. Under [`IdPolicy::Monotonic`] it advances
    /// the counter, so later [`add_todo`](Self::add_todo) calls never reuse it.
    fn add_todo_with_id(&self, id: TodoId, text: &str);

    /// Flips `done` on the matching todo. Unknown ids are ignored.
    fn toggle_todo(&self, id: TodoId);

    /// Removes the matching todo. Unknown ids are ignored.
    fn remove_todo(&self, id: TodoId);

    /// Registers `f` to run after every state change.
    fn subscribe(&self, f: Box<dyn Fn()>) -> Subscription;

    /// Empties the list.
    fn reset(&self);

    fn len(&self) -> usize {
        self.todos().len()
    }
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
