//! GSS IR - the mutable CSS tree and its traversal engine.
//!
//! This crate contains the core data structures for the GSS compiler:
//! - `SourceCode` / `SourceCodeLocation` for source positions
//! - The arena-backed `CssTree` with `NodeId(u32)` indices
//! - `NodeKind`, the closed set of node variants with per-container
//!   child allow-lists
//! - The visit controller driving enter/leave traversal and mediating
//!   in-place mutation
//!
//! # Design Philosophy
//!
//! - **Flatten everything**: no `Box<Node>`, nodes reference each other
//!   by `NodeId(u32)` index into one contiguous arena.
//! - **Single owner per child**: the parent back-reference is a lookup
//!   relation written only by the tree's reparenting entry points;
//!   attaching an already-parented node is a structural violation and
//!   panics.
//! - **Mutation rides the traversal**: passes rewrite the tree through
//!   the visit controller's remove/replace operations, never by editing
//!   child lists directly.

pub mod ast;
mod comment;
mod location;
mod node_id;
mod source;
pub mod visit;

pub use ast::{
    BooleanOp, Combinator, ConditionalKind, CssTree, Node, NodeFlags, NodeKind, NodeTag,
};
pub use comment::Comment;
pub use location::{LocationError, SourceCodeLocation, SourcePoint};
pub use node_id::NodeId;
pub use source::SourceCode;
pub use visit::{CssTreeVisitor, MutationContext, VisitController};
