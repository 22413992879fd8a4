//! Document tree produced by a parse.
//!
//! Every scalar is kept as text: the script format carries no reliable type
//! information, so `1`, `yes` and `"Hello"` all become [`Node::Scalar`].
//! Objects preserve insertion order, which is observable through iteration.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;

/// Keyed block contents in source order. Keys are unique; repeated keys are
/// folded into a [`Node::Array`] by [`insert_merged`].
pub type Object = IndexMap<String, Node>;

/// One node of the document tree.
///
/// Serializes untagged, so a tree renders as plain JSON: scalars as strings,
/// objects as JSON objects (in insertion order), arrays as JSON arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Scalar(String),
    Object(Object),
    /// Only ever produced by key-collision promotion.
    Array(Vec<Node>),
}

impl Node {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Node::Array(_))
    }

    /// Look up `key` when this node is an object.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Iterate the occurrences this node stands for.
    ///
    /// A key written once stores its value directly, while a repeated key
    /// stores an array of every occurrence. `values()` hides the difference:
    /// it yields each array element, or the node itself for anything else.
    ///
    /// ```
    /// use clausewitz_core::parse_str;
    ///
    /// let doc = parse_str("modifier = { a = 1 }\nmodifier = { a = 2 }").unwrap();
    /// assert_eq!(doc["modifier"].values().count(), 2);
    /// ```
    pub fn values(&self) -> std::slice::Iter<'_, Node> {
        match self {
            Node::Array(items) => items.iter(),
            single => std::slice::from_ref(single).iter(),
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(s)
    }
}

impl From<Object> for Node {
    fn from(map: Object) -> Self {
        Node::Object(map)
    }
}

/// Insert `value` under `key`, promoting on collision.
///
/// A first occurrence is stored as-is. A second occurrence replaces the stored
/// value with an array holding both; later occurrences append to that array,
/// so repeated keys never produce arrays of arrays.
pub fn insert_merged(object: &mut Object, key: String, value: Node) {
    match object.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Node::Array(items) => items.push(value),
            existing => {
                let first = std::mem::replace(existing, Node::Array(Vec::with_capacity(2)));
                if let Node::Array(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
        },
    }
}
