//! Objects tracked by the mutability harness.
//!
//! Each nesting level sits behind its own `Rc`, so whether an update copied or
//! shared a level can be observed with `Rc::ptr_eq`.

use std::rc::Rc;

use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepObject {
    pub nested: Rc<Nested>,
    pub reference: Rc<Reference>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nested {
    pub array: Rc<Vec<i64>>,
    pub object: Rc<NestedObject>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedObject {
    pub value: String,
    pub deep_nested: Rc<DeepNested>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepNested {
    pub value: String,
    pub array: Rc<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reference {
    pub value: String,
}

impl DeepObject {
    pub fn pristine() -> Rc<Self> {
        Rc::new(Self {
            nested: Rc::new(Nested {
                array: Rc::new(vec![1, 2, 3]),
                object: Rc::new(NestedObject {
                    value: "original".into(),
                    deep_nested: Rc::new(DeepNested {
                        value: "deep-original".into(),
                        array: Rc::new(vec!["a".into(), "b".into(), "c".into()]),
                    }),
                }),
            }),
            reference: Rc::new(Reference {
                value: "reference-original".into(),
            }),
        })
    }
}

/// Copy-on-write update.
///
/// `recipe` edits a draft of `current`. Every level reached through `Rc::make_mut`
/// is copied because `current` still holds it; levels the recipe does not touch stay
/// shared with `current`. The result is always a new root.
pub fn update_cow<T: Clone>(current: &Rc<T>, recipe: impl FnOnce(&mut T)) -> Rc<T> {
    let mut next = current.clone();
    recipe(Rc::make_mut(&mut next));
    next
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReferenceObject {
    pub value: String,
    pub array: Vec<i64>,
}

impl ExternalReferenceObject {
    pub fn pristine() -> Self {
        Self {
            value: "original".into(),
            array: vec![1, 2, 3],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Display, FromStr, PartialEq, Eq, Serialize, Deserialize)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AsyncStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncObject {
    pub value: String,
    pub status: AsyncStatus,
}

impl AsyncObject {
    pub const MUTATED_VALUE: &'static str = "async-mutated";

    pub fn pristine() -> Self {
        Self {
            value: "initial".into(),
            status: AsyncStatus::Idle,
        }
    }
}
