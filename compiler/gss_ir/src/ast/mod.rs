//! AST node model: variants, tags, allow-lists and the arena tree.

mod kind;
mod tree;

pub use kind::{BooleanOp, Combinator, ConditionalKind, NodeFlags, NodeKind, NodeTag};
pub use tree::{CssTree, Node};
