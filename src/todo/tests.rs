use super::*;

#[test]
fn new_todo_is_not_done() {
    let t = Todo::new(TodoId(3), "x");
    assert_eq!(t.id, TodoId(3));
    assert_eq!(t.text, "x");
    assert!(!t.done);
}

#[test]
fn monotonic_ids_increase() {
    let ids = IdSource::new(IdPolicy::Monotonic);
    assert_eq!(ids.next_id(), TodoId(1));
    assert_eq!(ids.next_id(), TodoId(2));
    assert_eq!(ids.next_id(), TodoId(3));
    ids.reset();
    assert_eq!(ids.next_id(), TodoId(1));
}

#[test]
fn clock_ids_are_epoch_millis() {
    let ids = IdSource::new(IdPolicy::Clock);
    let before = clock_millis();
    let id = ids.next_id();
    let after = clock_millis();
    assert!(before <= id.0 && id.0 <= after);
}

#[test]
fn todo_id_display() {
    assert_eq!(TodoId(42).to_string(), "42");
    assert_eq!("42".parse::<TodoId>().unwrap(), TodoId(42));
}

#[test]
fn todo_serializes_flat_id() {
    let json = serde_json::to_value(Todo::new(TodoId(7), "a")).unwrap();
    assert_eq!(json, serde_json::json!({ "id": 7, "text": "a", "done": false }));
}

#[test]
fn observed_ids_are_skipped() {
    let ids = IdSource::new(IdPolicy::Monotonic);
    ids.observe(TodoId(1));
    assert_eq!(ids.next_id(), TodoId(2));
    ids.observe(TodoId(10));
    assert_eq!(ids.next_id(), TodoId(11));
    ids.observe(TodoId(3));
    assert_eq!(ids.next_id(), TodoId(12));
}

#[test]
fn observe_saturates_at_max() {
    let ids = IdSource::new(IdPolicy::Monotonic);
    ids.observe(TodoId(u64::MAX));
    assert_eq!(ids.next_id(), TodoId(u64::MAX));
}

#[test]
fn supplied_and_generated_ids_stay_unique() {
    let stores: [Box<dyn TodoStore>; 2] = [
        Box::new(crate::SnapshotStore::new(IdPolicy::Monotonic)),
        Box::new(crate::ProxyStore::new(IdPolicy::Monotonic)),
    ];
    for s in stores {
        s.add_todo_with_id(TodoId(1), "supplied");
        s.add_todo("generated");
        let ids: Vec<_> = s.todos().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TodoId(1), TodoId(2)]);
        s.remove_todo(TodoId(1));
        assert_eq!(s.len(), 1);
        assert_eq!(s.todos()[0].text, "generated");
    }
}
