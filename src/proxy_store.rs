use std::cell::{RefCell, RefMut};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{IdPolicy, IdSource, Listeners, Subscription, Todo, TodoId, TodoStore};

#[cfg(test)]
mod tests;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoListState {
    pub todos: Vec<Todo>,
}

/// Todo store that is mutated in place.
///
/// Writes go through [`ProxyStore::borrow_mut`]; the returned guard notifies
/// subscribers once when it is dropped, if it was mutably dereferenced.
pub struct ProxyStore {
    state: RefCell<TodoListState>,
    ids: IdSource,
    listeners: Listeners,
}

impl ProxyStore {
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            state: RefCell::new(TodoListState::default()),
            ids: IdSource::new(policy),
            listeners: Listeners::new(),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> TodoListState {
        self.state.borrow().clone()
    }

    /// Mutably borrows the state.
    ///
    /// Panics if the state is already borrowed, for example when called from inside a listener
    /// while another guard is alive.
    pub fn borrow_mut(&self) -> ProxyRefMut<'_> {
        ProxyRefMut {
            value: Some(self.state.borrow_mut()),
            is_dirty: false,
            listeners: &self.listeners,
        }
    }

    /// Sets the whole state and notifies subscribers.
    pub fn set(&self, value: TodoListState) {
        *self.borrow_mut() = value;
    }
}
impl Default for ProxyStore {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}
impl std::fmt::Debug for ProxyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.try_borrow() {
            Ok(value) => std::fmt::Debug::fmt(&*value, f),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}

impl TodoStore for ProxyStore {
    fn todos(&self) -> Vec<Todo> {
        self.state.borrow().todos.clone()
    }
    fn add_todo(&self, text: &str) {
        self.add_todo_with_id(self.ids.next_id(), text);
    }
    fn add_todo_with_id(&self, id: TodoId, text: &str) {
        debug!("proxy store: add {id}");
        self.ids.observe(id);
        self.borrow_mut().todos.push(Todo::new(id, text));
    }
    fn toggle_todo(&self, id: TodoId) {
        debug!("proxy store: toggle {id}");
        let mut s = self.borrow_mut();
        if let Some(index) = s.todos.iter().position(|t| t.id == id) {
            let todo = &mut s.todos[index];
            todo.done = !todo.done;
        }
    }
    fn remove_todo(&self, id: TodoId) {
        debug!("proxy store: remove {id}");
        let mut s = self.borrow_mut();
        if s.todos.iter().any(|t| t.id == id) {
            s.todos.retain(|t| t.id != id);
        }
    }
    fn subscribe(&self, f: Box<dyn Fn()>) -> Subscription {
        self.listeners.subscribe(f)
    }
    fn reset(&self) {
        debug!("proxy store: reset");
        self.ids.reset();
        self.set(TodoListState::default());
    }
    fn len(&self) -> usize {
        self.state.borrow().todos.len()
    }
}

pub struct ProxyRefMut<'a> {
    value: Option<RefMut<'a, TodoListState>>,
    is_dirty: bool,
    listeners: &'a Listeners,
}
impl std::ops::Deref for ProxyRefMut<'_> {
    type Target = TodoListState;
    fn deref(&self) -> &Self::Target {
        self.value.as_ref().unwrap()
    }
}
impl std::ops::DerefMut for ProxyRefMut<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.is_dirty = true;
        self.value.as_mut().unwrap()
    }
}
impl Drop for ProxyRefMut<'_> {
    fn drop(&mut self) {
        // Release the borrow first so listeners can read the store.
        self.value = None;
        if self.is_dirty {
            self.listeners.notify();
        }
    }
}
