//! Value types: step metadata and the traceable structure shapes.

pub mod metadata;
pub mod graph;
pub mod tree;
pub mod collections;

pub use metadata::{Annotations, CodeContext, MetadataError, StepMetadata, HIGHLIGHT_PREFIX};
pub use graph::Graph;
pub use tree::{BinaryNode, OrderedNode, Shape, TreeShape, TreeSnapshot};
pub use collections::{Mapping, Sequence};
