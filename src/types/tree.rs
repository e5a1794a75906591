//! Tree node shapes accepted by the canonical graph builder.
//!
//! Three incompatible shapes are supported:
//!
//! 1. **Binary**: a node with optional `left` / `right` children ([`BinaryNode`])
//! 2. **Children**: a node with an ordered list of children ([`OrderedNode`])
//! 3. **Mapping**: a nested mapping with a `value` entry and an ordered
//!    `children` list (`serde_json::Value`)
//!
//! Custom node types join in by implementing [`TreeShape`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The structural capability a tree node exposes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a, N> {
    /// Node with optional `left` / `right` children, visited left then right.
    Binary {
        /// Left child.
        left: Option<&'a N>,
        /// Right child.
        right: Option<&'a N>,
    },
    /// Node with an ordered list of children. `None` entries are skipped.
    Children(Vec<Option<&'a N>>),
    /// Mapping with `value` and `children` entries. `None` entries are skipped.
    Mapping(Vec<Option<&'a N>>),
    /// Matches none of the shapes above.
    Unrecognized,
}

impl<'a, N> Shape<'a, N> {
    /// Children in visiting order, including absent ones.
    pub fn into_children(self) -> Vec<Option<&'a N>> {
        match self {
            Self::Binary { left, right } => vec![left, right],
            Self::Children(children) | Self::Mapping(children) => children,
            Self::Unrecognized => Vec::new(),
        }
    }

    /// Whether the node matched one of the supported shapes.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binary { .. } => "binary",
            Self::Children(_) => "children",
            Self::Mapping(_) => "mapping",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// A tree node that can be normalized into a [`CanonicalGraph`](crate::CanonicalGraph).
pub trait TreeShape: Sized {
    /// Display label: the node's `val`, else its `value`, else the node itself.
    fn label(&self) -> String;

    /// The node's structural shape.
    fn shape(&self) -> Shape<'_, Self>;
}

/// A captured tree snapshot, possibly empty.
pub trait TreeSnapshot {
    /// Node type of the tree.
    type Node: TreeShape;

    /// Root node, or `None` for an empty tree.
    fn root(&self) -> Option<&Self::Node>;
}

/// Binary tree node with `val`, `left` and `right`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryNode<T> {
    /// Node value.
    pub val: T,
    /// Left child.
    pub left: Option<Box<BinaryNode<T>>>,
    /// Right child.
    pub right: Option<Box<BinaryNode<T>>>,
}

impl<T> BinaryNode<T> {
    /// Create a leaf.
    pub fn new(val: T) -> Self {
        Self {
            val,
            left: None,
            right: None,
        }
    }

    /// Set the left child.
    pub fn with_left(mut self, left: BinaryNode<T>) -> Self {
        self.left = Some(Box::new(left));
        self
    }

    /// Set the right child.
    pub fn with_right(mut self, right: BinaryNode<T>) -> Self {
        self.right = Some(Box::new(right));
        self
    }
}

impl<T: fmt::Display> TreeShape for BinaryNode<T> {
    fn label(&self) -> String {
        self.val.to_string()
    }

    fn shape(&self) -> Shape<'_, Self> {
        Shape::Binary {
            left: self.left.as_deref(),
            right: self.right.as_deref(),
        }
    }
}

/// Tree node with an ordered list of children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderedNode<T> {
    /// Node value.
    pub value: T,
    /// Children in order.
    pub children: Vec<OrderedNode<T>>,
}

impl<T> OrderedNode<T> {
    /// Create a leaf.
    pub fn new(value: T) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    /// Append a child.
    pub fn with_child(mut self, child: OrderedNode<T>) -> Self {
        self.children.push(child);
        self
    }
}

impl<T: fmt::Display> TreeShape for OrderedNode<T> {
    fn label(&self) -> String {
        self.value.to_string()
    }

    fn shape(&self) -> Shape<'_, Self> {
        Shape::Children(self.children.iter().map(Some).collect())
    }
}

impl TreeShape for Value {
    fn label(&self) -> String {
        match self {
            Value::Object(map) => map
                .get("val")
                .or_else(|| map.get("value"))
                .map(scalar_label)
                .unwrap_or_else(|| self.to_string()),
            other => scalar_label(other),
        }
    }

    fn shape(&self) -> Shape<'_, Self> {
        match self {
            Value::Object(map) if map.contains_key("value") => {
                let children = match map.get("children") {
                    Some(Value::Array(children)) => children
                        .iter()
                        .map(|c| if c.is_null() { None } else { Some(c) })
                        .collect(),
                    _ => Vec::new(),
                };
                Shape::Mapping(children)
            }
            _ => Shape::Unrecognized,
        }
    }
}

/// Strings render bare, everything else as JSON.
fn scalar_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<T: fmt::Display> TreeSnapshot for BinaryNode<T> {
    type Node = Self;

    fn root(&self) -> Option<&Self> {
        Some(self)
    }
}

impl<T: fmt::Display> TreeSnapshot for Option<BinaryNode<T>> {
    type Node = BinaryNode<T>;

    fn root(&self) -> Option<&BinaryNode<T>> {
        self.as_ref()
    }
}

impl<T: fmt::Display> TreeSnapshot for OrderedNode<T> {
    type Node = Self;

    fn root(&self) -> Option<&Self> {
        Some(self)
    }
}

impl<T: fmt::Display> TreeSnapshot for Option<OrderedNode<T>> {
    type Node = OrderedNode<T>;

    fn root(&self) -> Option<&OrderedNode<T>> {
        self.as_ref()
    }
}

impl TreeSnapshot for Value {
    type Node = Self;

    fn root(&self) -> Option<&Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binary_shape() {
        let node = BinaryNode::new(1).with_right(BinaryNode::new(3));
        match node.shape() {
            Shape::Binary { left, right } => {
                assert!(left.is_none());
                assert_eq!(right.map(|n| n.val), Some(3));
            }
            other => panic!("unexpected shape {}", other.name()),
        }
    }

    #[test]
    fn test_mapping_shape_skips_nulls() {
        let tree = json!({"value": "a", "children": [{"value": "b"}, null]});
        let children = tree.shape().into_children();

        assert_eq!(children.len(), 2);
        assert!(children[1].is_none());
        assert_eq!(children[0].map(TreeShape::label).as_deref(), Some("b"));
    }

    #[test]
    fn test_value_label_precedence() {
        assert_eq!(json!({"val": 1, "value": 2}).label(), "1");
        assert_eq!(json!({"value": "x"}).label(), "x");
        assert_eq!(json!(7).label(), "7");
    }

    #[test]
    fn test_unrecognized_mapping() {
        assert!(!json!({"children": []}).shape().is_recognized());
        assert!(!json!([1, 2, 3]).shape().is_recognized());
    }

    #[test]
    fn test_snapshot_roots() {
        let empty: Option<BinaryNode<i32>> = None;
        assert!(empty.root().is_none());
        assert!(Value::Null.root().is_none());
        assert!(OrderedNode::new("r").root().is_some());
    }
}
