use std::{cell::RefCell, rc::Rc};

use derive_ex::derive_ex;
use log::debug;
use serde::Serialize;

use crate::{IdPolicy, IdSource, Listeners, Subscription, Todo, TodoId, TodoStore};


/// Immutable todo list.
///
/// Every update produces a new root. Items that an update does not touch are
/// shared with the previous snapshot, so `Rc::ptr_eq` holds for them.
#[derive_ex(Default)]
#[default(Self::new())]
#[derive(Clone)]
pub struct TodoSnapshot(Rc<[Rc<Todo>]>);

impl TodoSnapshot {
    pub fn new() -> Self {
        Self(Rc::from(Vec::new()))
    }
    pub fn from_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        Self(todos.into_iter().map(Rc::new).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&Rc<Todo>> {
        self.0.get(index)
    }
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Todo>> {
        self.0.iter()
    }
    pub fn find(&self, id: TodoId) -> Option<&Rc<Todo>> {
        self.0.iter().find(|t| t.id == id)
    }
    fn position(&self, id: TodoId) -> Option<usize> {
        self.0.iter().position(|t| t.id == id)
    }
    pub fn to_vec(&self) -> Vec<Todo> {
        self.0.iter().map(|t| Todo::clone(t)).collect()
    }

    /// Returns `true` if both snapshots are the same root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn with_added(&self, todo: Todo) -> Self {
        Self(
            self.0
                .iter()
                .cloned()
                .chain(Some(Rc::new(todo)))
                .collect(),
        )
    }

    /// Returns `self` unchanged (same root) if `id` is not present.
    pub fn with_toggled(&self, id: TodoId) -> Self {
        let Some(index) = self.position(id) else {
            return self.clone();
        };
        Self(
            self.0
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    if i == index {
                        Rc::new(Todo {
                            done: !t.done,
                            ..Todo::clone(t)
                        })
                    } else {
                        t.clone()
                    }
                })
                .collect(),
        )
    }

    /// Returns `self` unchanged (same root) if `id` is not present.
    pub fn without(&self, id: TodoId) -> Self {
        if self.position(id).is_none() {
            return self.clone();
        }
        Self(self.0.iter().filter(|t| t.id != id).cloned().collect())
    }
}
impl std::fmt::Debug for TodoSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
impl PartialEq for TodoSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}
impl Serialize for TodoSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_seq(self.0.iter().map(|t| &**t))
    }
}

/// Todo store where each operation replaces the whole snapshot.
pub struct SnapshotStore {
    current: RefCell<TodoSnapshot>,
    ids: IdSource,
    listeners: Listeners,
}

impl SnapshotStore {
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            current: RefCell::new(TodoSnapshot::new()),
            ids: IdSource::new(policy),
            listeners: Listeners::new(),
        }
    }

    /// Current root.
    pub fn snapshot(&self) -> TodoSnapshot {
        self.current.borrow().clone()
    }

    /// Replaces the snapshot with the result of `f`.
    ///
    /// Subscribers are notified once, and only if `f` returned a different root.
    pub fn update(&self, f: impl FnOnce(&TodoSnapshot) -> TodoSnapshot) {
        let current = self.snapshot();
        let next = f(&current);
        if next.ptr_eq(&current) {
            return;
        }
        *self.current.borrow_mut() = next;
        self.listeners.notify();
    }
}
impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}
impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.current.try_borrow() {
            Ok(value) => std::fmt::Debug::fmt(&*value, f),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}

impl TodoStore for SnapshotStore {
    fn todos(&self) -> Vec<Todo> {
        self.current.borrow().to_vec()
    }
    fn add_todo(&self, text: &str) {
        self.add_todo_with_id(self.ids.next_id(), text);
    }
    fn add_todo_with_id(&self, id: TodoId, text: &str) {
        debug!("snapshot store: add {id}");
        self.ids.observe(id);
        self.update(|s| s.with_added(Todo::new(id, text)));
    }
    fn toggle_todo(&self, id: TodoId) {
        debug!("snapshot store: toggle {id}");
        self.update(|s| s.with_toggled(id));
    }
    fn remove_todo(&self, id: TodoId) {
        debug!("snapshot store: remove {id}");
        self.update(|s| s.without(id));
    }
    fn subscribe(&self, f: Box<dyn Fn()>) -> Subscription {
        self.listeners.subscribe(f)
    }
    fn reset(&self) {
        debug!("snapshot store: reset");
        self.ids.reset();
        self.update(|_| TodoSnapshot::new());
    }
    fn len(&self) -> usize {
        self.current.borrow().len()
    }
}
