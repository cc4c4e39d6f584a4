use std::rc::Rc;

use assert_call::{CallRecorder, call};
use pretty_assertions::assert_eq;

use super::*;

fn store_with(texts: &[&str]) -> ProxyStore {
    let s = ProxyStore::new(IdPolicy::Monotonic);
    for text in texts {
        s.add_todo(text);
    }
    s
}

#[test]
fn add_to_empty() {
    let s = ProxyStore::new(IdPolicy::Monotonic);
    s.add_todo("x");
    assert_eq!(s.todos(), vec![Todo::new(TodoId(1), "x")]);
}

#[test]
fn toggle_twice_restores() {
    let s = store_with(&["a", "b"]);
    s.toggle_todo(TodoId(2));
    assert!(s.todos()[1].done);
    assert!(!s.todos()[0].done);
    s.toggle_todo(TodoId(2));
    assert!(!s.todos()[1].done);
}

#[test]
fn remove_unknown_leaves_contents() {
    let s = store_with(&["a", "b"]);
    let before = s.snapshot();
    s.remove_todo(TodoId(42));
    assert_eq!(s.snapshot(), before);
}

#[test]
fn remove_preserves_order() {
    let s = store_with(&["a", "b", "c"]);
    s.remove_todo(TodoId(1));
    let texts: Vec<_> = s.todos().into_iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["b", "c"]);
}

#[test]
fn notifies_once_per_operation() {
    let mut cr = CallRecorder::new();
    let s = store_with(&["a", "b"]);
    let _sub = s.subscribe(Box::new(|| call!("changed")));
    s.add_todo("c");
    cr.verify("changed");
    s.toggle_todo(TodoId(1));
    cr.verify("changed");
    s.remove_todo(TodoId(3));
    cr.verify("changed");
}

#[test]
fn no_notify_on_unknown_id() {
    let mut cr = CallRecorder::new();
    let s = store_with(&["a"]);
    let _sub = s.subscribe(Box::new(|| call!("changed")));
    s.toggle_todo(TodoId(99));
    s.remove_todo(TodoId(99));
    cr.verify(());
}

#[test]
fn batched_writes_notify_once() {
    let mut cr = CallRecorder::new();
    let s = store_with(&[]);
    let _sub = s.subscribe(Box::new(|| call!("changed")));
    {
        let mut w = s.borrow_mut();
        w.todos.push(Todo::new(TodoId(10), "a"));
        w.todos.push(Todo::new(TodoId(11), "b"));
        w.todos[0].done = true;
        cr.verify(());
    }
    cr.verify("changed");
    assert_eq!(s.len(), 2);
}

#[test]
fn read_only_guard_does_not_notify() {
    let mut cr = CallRecorder::new();
    let s = store_with(&["a"]);
    let _sub = s.subscribe(Box::new(|| call!("changed")));
    {
        let r = s.borrow_mut();
        assert_eq!(r.todos.len(), 1);
    }
    cr.verify(());
}

#[test]
fn listener_sees_new_state_synchronously() {
    let mut cr = CallRecorder::new();
    let s = Rc::new(store_with(&[]));
    let _sub = s.subscribe(Box::new({
        let s = Rc::downgrade(&s);
        move || {
            if let Some(s) = s.upgrade() {
                call!("{}", s.len());
            }
        }
    }));
    s.add_todo("a");
    cr.verify("1");
}

#[test]
fn reset_empties() {
    let s = store_with(&["a", "b"]);
    s.reset();
    assert!(s.is_empty());
    s.add_todo("c");
    assert_eq!(s.todos()[0].id, TodoId(1));
}
