use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use statelab::{IdPolicy, ProxyStore, SnapshotStore, Todo, TodoId, TodoStore};

#[derive(Clone, Copy, Debug)]
enum Op {
    Add(u64, &'static str),
    Toggle(u64),
    Remove(u64),
}

fn apply(store: &dyn TodoStore, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Add(id, text) => store.add_todo_with_id(TodoId(id), text),
            Op::Toggle(id) => store.toggle_todo(TodoId(id)),
            Op::Remove(id) => store.remove_todo(TodoId(id)),
        }
    }
}

fn stores() -> (SnapshotStore, ProxyStore) {
    (
        SnapshotStore::new(IdPolicy::Monotonic),
        ProxyStore::new(IdPolicy::Monotonic),
    )
}

#[rstest]
#[case::empty(&[])]
#[case::single_add(&[Op::Add(1, "x")])]
#[case::toggle(&[Op::Add(1, "a"), Op::Add(2, "b"), Op::Toggle(2)])]
#[case::toggle_twice(&[Op::Add(1, "a"), Op::Toggle(1), Op::Toggle(1)])]
#[case::remove_middle(&[Op::Add(1, "a"), Op::Add(2, "b"), Op::Add(3, "c"), Op::Remove(2)])]
#[case::unknown_ids(&[Op::Add(1, "a"), Op::Toggle(9), Op::Remove(9)])]
#[case::remove_then_add(&[Op::Add(1, "a"), Op::Remove(1), Op::Add(2, ""), Op::Toggle(2)])]
#[case::remove_all(&[Op::Add(1, "a"), Op::Add(2, "b"), Op::Remove(1), Op::Remove(2), Op::Remove(2)])]
fn stores_converge(#[case] ops: &[Op]) {
    let (a, b) = stores();
    apply(&a, ops);
    apply(&b, ops);
    assert_eq!(a.todos(), b.todos());
}

#[test]
fn converge_on_generated_sequence() {
    let (a, b) = stores();
    let mut ops = Vec::new();
    for i in 0..50u64 {
        ops.push(Op::Add(i, "t"));
        if i % 3 == 0 {
            ops.push(Op::Toggle(i / 2));
        }
        if i % 5 == 0 {
            ops.push(Op::Remove(i / 3));
        }
    }
    apply(&a, &ops);
    apply(&b, &ops);
    assert_eq!(a.todos(), b.todos());
}

#[rstest]
fn add_increments_length(
    #[values(
        Rc::new(SnapshotStore::new(IdPolicy::Monotonic)) as Rc<dyn TodoStore>,
        Rc::new(ProxyStore::new(IdPolicy::Monotonic)) as Rc<dyn TodoStore>
    )]
    store: Rc<dyn TodoStore>,
) {
    for n in 1..=3 {
        store.add_todo("x");
        assert_eq!(store.len(), n);
    }
    assert_eq!(
        store.todos()[0],
        Todo {
            id: TodoId(1),
            text: "x".into(),
            done: false
        }
    );
}

#[test]
fn snapshot_remove_unknown_keeps_root() {
    let (a, _) = stores();
    a.add_todo("a");
    let before = a.snapshot();
    a.remove_todo(TodoId(42));
    assert!(before.ptr_eq(&a.snapshot()));
}

#[test]
fn snapshot_toggle_shares_other_items() {
    let (a, _) = stores();
    for t in ["a", "b", "c", "d"] {
        a.add_todo(t);
    }
    let before = a.snapshot();
    a.toggle_todo(TodoId(3));
    let after = a.snapshot();
    for i in [0, 1, 3] {
        assert!(Rc::ptr_eq(before.get(i).unwrap(), after.get(i).unwrap()));
    }
}
