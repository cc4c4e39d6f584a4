use pretty_assertions::assert_eq;

use super::*;

#[test]
fn pristine_serializes_with_camel_case() {
    let json = serde_json::to_value(&*DeepObject::pristine()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "nested": {
                "array": [1, 2, 3],
                "object": {
                    "value": "original",
                    "deepNested": {
                        "value": "deep-original",
                        "array": ["a", "b", "c"]
                    }
                }
            },
            "reference": { "value": "reference-original" }
        })
    );
}

#[test]
fn pristine_instances_are_distinct() {
    let a = DeepObject::pristine();
    let b = DeepObject::pristine();
    assert_eq!(a, b);
    assert!(!Rc::ptr_eq(&a, &b));
}

#[test]
fn update_cow_leaves_original_untouched() {
    let before = DeepObject::pristine();
    let after = update_cow(&before, |d| {
        let nested = Rc::make_mut(&mut d.nested);
        Rc::make_mut(&mut nested.array).push(4);
    });
    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(*before.nested.array, vec![1, 2, 3]);
    assert_eq!(*after.nested.array, vec![1, 2, 3, 4]);
    assert!(Rc::ptr_eq(&before.reference, &after.reference));
    assert!(Rc::ptr_eq(&before.nested.object, &after.nested.object));
}

#[test]
fn update_cow_with_noop_recipe_still_new_root() {
    let before = DeepObject::pristine();
    let after = update_cow(&before, |_| {});
    assert!(!Rc::ptr_eq(&before, &after));
    assert!(Rc::ptr_eq(&before.nested, &after.nested));
}

#[test]
fn async_status_display() {
    assert_eq!(AsyncStatus::Idle.to_string(), "idle");
    assert_eq!(AsyncStatus::Loading.to_string(), "loading");
    assert_eq!(AsyncStatus::Success.to_string(), "success");
    assert_eq!(AsyncStatus::Error.to_string(), "error");
    assert_eq!("success".parse::<AsyncStatus>().unwrap(), AsyncStatus::Success);
}

#[test]
fn async_object_pristine() {
    let a = AsyncObject::pristine();
    assert_eq!(a.status, AsyncStatus::Idle);
    assert_eq!(a.value, "initial");
}
