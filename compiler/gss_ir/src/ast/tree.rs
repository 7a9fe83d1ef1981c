//! The mutable CSS tree.
//!
//! Nodes live in a contiguous arena owned by [`CssTree`] and reference
//! each other by [`NodeId`]. Every node has exactly one parent (or none,
//! while detached); the parent back-reference is a lookup relation, not
//! ownership, and is only ever written by the tree's own reparenting
//! entry points. Structural preconditions — inserting a child kind the
//! container does not allow, attaching an already-parented node — panic
//! immediately: they are programming errors, not input errors.

use crate::ast::kind::{NodeFlags, NodeKind, NodeTag};
use crate::comment::Comment;
use crate::location::SourceCodeLocation;
use crate::node_id::NodeId;

/// One node of the tree: variant data plus location, comments, flags and
/// the non-owning parent back-reference.
#[derive(Clone, Debug)]
pub struct Node {
    kind: NodeKind,
    location: SourceCodeLocation,
    comments: Vec<Comment>,
    flags: NodeFlags,
    parent: NodeId,
}

impl Node {
    /// The variant data of this node.
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The node's source location (unknown for synthesized nodes).
    #[inline]
    pub fn location(&self) -> &SourceCodeLocation {
        &self.location
    }

    /// Comments attached to this node.
    #[inline]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// The node's flags.
    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// The parent back-reference; `NodeId::INVALID` while detached.
    #[inline]
    pub fn parent(&self) -> NodeId {
        self.parent
    }
}

/// Arena-backed mutable CSS tree.
///
/// A freshly created tree holds a `Root` with an empty `ImportBlock` and
/// an empty `Body`. Nodes removed from their parent's child list become
/// unreachable; their arena slots are not reused within a compilation.
#[derive(Clone, Debug)]
pub struct CssTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CssTree {
    /// Create a tree containing only the root scaffolding.
    pub fn new() -> Self {
        let mut tree = CssTree {
            nodes: Vec::new(),
            root: NodeId::INVALID,
        };
        let import_block = tree.alloc(NodeKind::ImportBlock { children: vec![] });
        let body = tree.alloc(NodeKind::Body { children: vec![] });
        let root = tree.alloc(NodeKind::Root { children: vec![] });
        tree.root = root;
        tree.append_child(root, import_block);
        tree.append_child(root, body);
        tree
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The root's import block.
    pub fn import_block(&self) -> NodeId {
        self.children(self.root)[0]
    }

    /// The root's body.
    pub fn body(&self) -> NodeId {
        self.children(self.root)[1]
    }

    /// Number of arena slots (including detached nodes).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // Allocation

    /// Allocate a detached node with an unknown location.
    ///
    /// # Panics
    /// Panics if `kind` already carries child ids; children are linked
    /// through [`CssTree::append_child`] so parent back-references stay
    /// consistent.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.alloc_at(kind, SourceCodeLocation::unknown())
    }

    /// Allocate a detached node with a source location.
    pub fn alloc_at(&mut self, kind: NodeKind, location: SourceCodeLocation) -> NodeId {
        assert!(
            kind.children().is_empty(),
            "structural violation: alloc of {:?} with pre-linked children",
            kind.tag()
        );
        let id = NodeId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        assert!(id.is_valid(), "node arena exhausted");
        self.nodes.push(Node {
            kind,
            location,
            comments: Vec::new(),
            flags: NodeFlags::empty(),
            parent: NodeId::INVALID,
        });
        id
    }

    // Accessors

    /// The node behind `id`.
    ///
    /// # Panics
    /// Panics on an invalid id; dangling ids are internal bugs.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The variant data of `id`.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Mutable variant data of `id`, for rewriting node-local fields
    /// (names, values, flags on the kind).
    ///
    /// The child list reachable through this reference must not be
    /// modified directly; structural changes go through the tree's
    /// insertion/removal API or the visit controller. Anything else is
    /// outside the mutation contract.
    #[inline]
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    /// The tag of `id`.
    #[inline]
    pub fn tag(&self, id: NodeId) -> NodeTag {
        self.nodes[id.index()].kind.tag()
    }

    /// The parent of `id` (`INVALID` while detached).
    #[inline]
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].parent
    }

    /// The live child list of `id`; empty for leaves.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes[id.index()].kind.children()
    }

    /// The node's flags.
    #[inline]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.nodes[id.index()].flags
    }

    /// Mutable access to the node's flags.
    #[inline]
    pub fn flags_mut(&mut self, id: NodeId) -> &mut NodeFlags {
        &mut self.nodes[id.index()].flags
    }

    /// The node's location.
    #[inline]
    pub fn location(&self, id: NodeId) -> &SourceCodeLocation {
        &self.nodes[id.index()].location
    }

    /// Overwrite the node's location.
    pub fn set_location(&mut self, id: NodeId, location: SourceCodeLocation) {
        self.nodes[id.index()].location = location;
    }

    /// Attach a comment to the node.
    pub fn add_comment(&mut self, id: NodeId, comment: Comment) {
        self.nodes[id.index()].comments.push(comment);
    }

    // Structural mutation

    /// Append `child` to `parent`'s child list.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child_at(parent, index, child);
    }

    /// Insert `child` into `parent`'s child list at `index`.
    ///
    /// # Panics
    /// Panics if the child's tag is not in the parent's allow-list, if
    /// the child already has a parent, or if `index` is out of bounds.
    pub fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.check_child_allowed(parent, child);
        self.become_parent_for_node(parent, child);
        let children = self.children_mut(parent);
        assert!(
            index <= children.len(),
            "structural violation: child index {index} out of bounds"
        );
        children.insert(index, child);
    }

    /// Remove and return the child at `index`, detaching it.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> NodeId {
        let child = self.children_mut(parent).remove(index);
        self.remove_as_parent_of_node(parent, child);
        child
    }

    /// Remove a specific child, detaching it.
    ///
    /// # Panics
    /// Panics if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(index) = self.children(parent).iter().position(|&c| c == child) else {
            panic!("structural violation: {child:?} is not a child of {parent:?}");
        };
        self.remove_child_at(parent, index);
    }

    /// Replace the child at `index` with `replacements`, in order.
    ///
    /// The old child is detached; each replacement is reparented to
    /// `parent` (allow-list checked).
    pub fn replace_child_at(&mut self, parent: NodeId, index: usize, replacements: &[NodeId]) {
        self.remove_child_at(parent, index);
        for (offset, &replacement) in replacements.iter().enumerate() {
            self.insert_child_at(parent, index + offset, replacement);
        }
    }

    /// Detach and return all children of `parent`.
    pub fn take_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let children = std::mem::take(self.children_mut(parent));
        for &child in &children {
            self.remove_as_parent_of_node(parent, child);
        }
        children
    }

    // Deep copy

    /// Produce a fully independent copy of the subtree rooted at `id`.
    ///
    /// The copy has fresh node identities, the same kinds, flags,
    /// comments and locations, and a detached (`INVALID`) parent.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let mut node = self.nodes[id.index()].clone();
        node.parent = NodeId::INVALID;
        let children = match node.kind.children_vec_mut() {
            Some(children) => std::mem::take(children),
            None => Vec::new(),
        };
        let copy = NodeId::new(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        assert!(copy.is_valid(), "node arena exhausted");
        self.nodes.push(node);
        for child in children {
            let child_copy = self.deep_copy(child);
            // Reparent directly: the copy's allow-list is satisfied by
            // construction because the original tree was well-formed.
            self.nodes[child_copy.index()].parent = copy;
            if let Some(list) = self.nodes[copy.index()].kind.children_vec_mut() {
                list.push(child_copy);
            }
        }
        copy
    }

    // Reparenting entry points (the only writers of `Node::parent`)

    fn become_parent_for_node(&mut self, parent: NodeId, child: NodeId) {
        let current = self.nodes[child.index()].parent;
        assert!(
            !current.is_valid(),
            "structural violation: {child:?} already has parent {current:?}; \
             a node may not be reachable from two parents"
        );
        self.nodes[child.index()].parent = parent;
    }

    fn remove_as_parent_of_node(&mut self, parent: NodeId, child: NodeId) {
        let current = self.nodes[child.index()].parent;
        assert!(
            current == parent,
            "structural violation: {parent:?} is not the parent of {child:?}"
        );
        self.nodes[child.index()].parent = NodeId::INVALID;
    }

    fn check_child_allowed(&self, parent: NodeId, child: NodeId) {
        let parent_tag = self.tag(parent);
        let child_tag = self.tag(child);
        assert!(
            parent_tag.accepts_child(child_tag),
            "structural violation: {parent_tag} does not accept {child_tag} children"
        );
    }

    fn children_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        let tag = self.nodes[id.index()].kind.tag();
        match self.nodes[id.index()].kind.children_vec_mut() {
            Some(children) => children,
            None => panic!("structural violation: {tag:?} is a leaf and has no child list"),
        }
    }
}

impl Default for CssTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn literal(tree: &mut CssTree, value: &str) -> NodeId {
        tree.alloc(NodeKind::Literal {
            value: value.into(),
        })
    }

    #[test]
    fn test_new_tree_scaffolding() {
        let tree = CssTree::new();
        assert_eq!(tree.tag(tree.root()), NodeTag::Root);
        assert_eq!(tree.tag(tree.import_block()), NodeTag::ImportBlock);
        assert_eq!(tree.tag(tree.body()), NodeTag::Body);
        assert_eq!(tree.parent(tree.body()), tree.root());
    }

    #[test]
    fn test_append_and_remove() {
        let mut tree = CssTree::new();
        let value = tree.alloc(NodeKind::PropertyValue { children: vec![] });
        let red = literal(&mut tree, "red");
        tree.append_child(value, red);
        assert_eq!(tree.children(value), &[red]);
        assert_eq!(tree.parent(red), value);

        tree.remove_child(value, red);
        assert!(tree.children(value).is_empty());
        assert!(!tree.parent(red).is_valid());
    }

    #[test]
    fn test_replace_child_splices_in_order() {
        let mut tree = CssTree::new();
        let value = tree.alloc(NodeKind::PropertyValue { children: vec![] });
        let a = literal(&mut tree, "a");
        let b = literal(&mut tree, "b");
        let c = literal(&mut tree, "c");
        tree.append_child(value, a);
        tree.append_child(value, c);

        let b2 = literal(&mut tree, "b2");
        tree.replace_child_at(value, 0, &[b, b2]);
        assert_eq!(tree.children(value), &[b, b2, c]);
        assert_eq!(tree.parent(b2), value);
        assert!(!tree.parent(a).is_valid());
    }

    #[test]
    #[should_panic(expected = "structural violation")]
    fn test_disallowed_child_kind_panics() {
        let mut tree = CssTree::new();
        let ruleset = tree.alloc(NodeKind::Ruleset { children: vec![] });
        let decl = tree.alloc(NodeKind::Declaration {
            property: "color".into(),
            children: vec![],
        });
        // Declarations belong in declaration blocks, not rulesets.
        tree.append_child(ruleset, decl);
    }

    #[test]
    #[should_panic(expected = "already has parent")]
    fn test_double_parenting_panics() {
        let mut tree = CssTree::new();
        let a = tree.alloc(NodeKind::PropertyValue { children: vec![] });
        let b = tree.alloc(NodeKind::PropertyValue { children: vec![] });
        let red = literal(&mut tree, "red");
        tree.append_child(a, red);
        tree.append_child(b, red);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut tree = CssTree::new();
        let value = tree.alloc(NodeKind::PropertyValue { children: vec![] });
        let red = literal(&mut tree, "red");
        tree.flags_mut(red).insert(NodeFlags::IS_DEFAULT);
        tree.append_child(value, red);

        let copy = tree.deep_copy(value);
        assert_ne!(copy, value);
        assert!(!tree.parent(copy).is_valid());
        assert_eq!(tree.children(copy).len(), 1);

        let red_copy = tree.children(copy)[0];
        assert_ne!(red_copy, red);
        assert_eq!(tree.parent(red_copy), copy);
        assert!(tree.flags(red_copy).contains(NodeFlags::IS_DEFAULT));
        assert_eq!(tree.kind(red_copy), tree.kind(red));
    }
}
