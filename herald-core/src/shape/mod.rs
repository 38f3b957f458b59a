//! Classification of a resolved target and the collect/reset algorithms.
//!
//! A target is classified once into a [`TargetShape`] before any flag is
//! touched:
//!
//! - a sequence holds items directly; non-object elements are skipped,
//! - a mapping where more than one value is an object is a collection keyed
//!   by name,
//! - any other mapping is a single item carrying its own `pushed` flag.
//!
//! A mapping with exactly one object-valued entry among other fields is
//! therefore a single item.

use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the only field the engine interprets.
pub const PUSHED_FIELD: &str = "pushed";

/// The resolved target is neither a sequence nor a mapping.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Selected JSON must be list/dict (of objects).")]
pub struct ShapeError;

/// Discriminant of a [`TargetShape`], handy for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// See [`TargetShape::Sequence`].
    Sequence,
    /// See [`TargetShape::Collection`].
    Collection,
    /// See [`TargetShape::Single`].
    Single,
}

/// Exclusive view of a target, tagged by how its items are laid out.
///
/// # Examples
///
/// ```
/// use herald_core::{ShapeKind, TargetShape};
/// use serde_json::json;
///
/// # fn main() -> Result<(), herald_core::ShapeError> {
/// let mut doc = json!({"k1": {"pushed": false}, "k2": {"pushed": true}});
/// let shape = TargetShape::classify(&mut doc)?;
/// assert_eq!(shape.kind(), ShapeKind::Collection);
///
/// let fresh = shape.collect_unpushed();
/// assert_eq!(fresh, vec![json!({"pushed": false})]);
/// assert_eq!(doc, json!({"k1": {"pushed": true}, "k2": {"pushed": true}}));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub enum TargetShape<'a> {
    /// A sequence whose object elements are items.
    Sequence(&'a mut Vec<Value>),
    /// A mapping whose object values are items.
    Collection(&'a mut Map<String, Value>),
    /// A mapping that is itself the one item.
    Single(&'a mut Map<String, Value>),
}

impl<'a> TargetShape<'a> {
    /// Classify `target`, failing for scalars and `null`.
    pub fn classify(target: &'a mut Value) -> Result<Self, ShapeError> {
        match target {
            Value::Array(items) => Ok(Self::Sequence(items)),
            Value::Object(map) => {
                if is_collection(map) {
                    Ok(Self::Collection(map))
                } else {
                    Ok(Self::Single(map))
                }
            }
            _ => Err(ShapeError),
        }
    }

    /// Which variant this is.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Sequence(_) => ShapeKind::Sequence,
            Self::Collection(_) => ShapeKind::Collection,
            Self::Single(_) => ShapeKind::Single,
        }
    }

    /// Mark every unpushed item as pushed and return copies taken before the
    /// mark, in traversal order.
    pub fn collect_unpushed(self) -> Vec<Value> {
        match self {
            Self::Sequence(items) => items.iter_mut().filter_map(take_unpushed).collect(),
            Self::Collection(map) => map.values_mut().filter_map(take_unpushed).collect(),
            Self::Single(map) => mark_pushed(map).into_iter().collect(),
        }
    }

    /// Clear the flag on every pushed item and return how many were cleared.
    pub fn reset_pushed(self) -> usize {
        match self {
            Self::Sequence(items) => items
                .iter_mut()
                .map(clear_value)
                .filter(|cleared| *cleared)
                .count(),
            Self::Collection(map) => map
                .values_mut()
                .map(clear_value)
                .filter(|cleared| *cleared)
                .count(),
            Self::Single(map) => usize::from(clear_pushed(map)),
        }
    }
}

/// Whether `item` counts as already pushed.
///
/// The flag is read with loose truthiness: `true`, non-zero numbers and
/// non-empty strings, sequences or mappings are pushed. An absent flag,
/// `false`, `null`, zero and empty values are not.
#[must_use]
pub fn is_pushed(item: &Map<String, Value>) -> bool {
    item.get(PUSHED_FIELD).is_some_and(truthy)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn is_collection(map: &Map<String, Value>) -> bool {
    map.values().filter(|value| value.is_object()).count() > 1
}

fn take_unpushed(item: &mut Value) -> Option<Value> {
    match item {
        Value::Object(map) => mark_pushed(map),
        _ => None,
    }
}

fn mark_pushed(item: &mut Map<String, Value>) -> Option<Value> {
    if is_pushed(item) {
        return None;
    }
    let snapshot = Value::Object(item.clone());
    item.insert(PUSHED_FIELD.to_owned(), Value::Bool(true));
    Some(snapshot)
}

fn clear_value(item: &mut Value) -> bool {
    match item {
        Value::Object(map) => clear_pushed(map),
        _ => false,
    }
}

fn clear_pushed(item: &mut Map<String, Value>) -> bool {
    if !is_pushed(item) {
        return false;
    }
    item.insert(PUSHED_FIELD.to_owned(), Value::Bool(false));
    true
}
