//! Tree traversal with structured in-place mutation.
//!
//! The visit controller drives one non-recursive traversal over a
//! [`CssTree`]: an explicit stack of `(node, child index, phase)` frames
//! produces strict preorder `enter` and postorder `leave` callbacks.
//! `enter` returns whether to descend into the node's children.
//!
//! Mutation happens through a [`MutationContext`] command slot passed to
//! `enter`: the visitor requests removal or replacement of the node
//! currently being entered, and the controller applies the request to the
//! innermost live child list when the callback returns. This keeps the
//! iteration index arithmetic in one place and guarantees that removing
//! the current node never skips its next sibling.
//!
//! Exactly one traversal can be active per tree: `start_visit` holds the
//! `&mut CssTree`, so a second concurrent traversal (or structural
//! mutation bypassing the controller) does not borrow-check. Direct
//! structural edits through [`CssTree::kind_mut`] during a visit are
//! outside the contract.

use smallvec::SmallVec;

use crate::ast::CssTree;
use crate::node_id::NodeId;

/// Visitor callbacks for one traversal.
///
/// Both callbacks receive the tree mutably so they can allocate
/// replacement nodes and rewrite node-local data; structural changes go
/// through the [`MutationContext`].
pub trait CssTreeVisitor {
    /// Called before a node's children. Return `false` to skip them
    /// (`leave` is still called).
    fn enter(&mut self, tree: &mut CssTree, node: NodeId, mutation: &mut MutationContext) -> bool {
        let _ = (tree, node, mutation);
        true
    }

    /// Called after a node's children (or immediately after `enter`
    /// returned `false`).
    fn leave(&mut self, tree: &mut CssTree, node: NodeId) {
        let _ = (tree, node);
    }
}

/// Pending structural mutation for the node currently being entered.
enum MutationOp {
    Remove,
    Replace {
        replacements: Vec<NodeId>,
        visit_replacements: bool,
    },
}

/// Command slot through which a visitor mutates the tree.
///
/// At most one request per callback; a second request panics (it would
/// be an internal bug, not bad input). Requests made while visiting the
/// traversal root panic when applied: the root is not inside any child
/// list.
pub struct MutationContext {
    op: Option<MutationOp>,
}

impl MutationContext {
    fn new() -> Self {
        MutationContext { op: None }
    }

    /// Delete the node currently being entered from its parent's child
    /// list. The next traversal step advances to what is now at the same
    /// index — the old next sibling is not skipped. The removed node
    /// receives no `leave`.
    pub fn remove_current_node(&mut self) {
        self.set(MutationOp::Remove);
    }

    /// Splice `replacements` in place of the node currently being
    /// entered, reparenting each to the same container. With
    /// `visit_replacements`, each replacement receives its own full
    /// enter/leave visit, in list order, before traversal resumes past
    /// the splice point; without it, traversal resumes immediately after
    /// the inserted span.
    pub fn replace_current_node(&mut self, replacements: Vec<NodeId>, visit_replacements: bool) {
        self.set(MutationOp::Replace {
            replacements,
            visit_replacements,
        });
    }

    fn set(&mut self, op: MutationOp) {
        assert!(
            self.op.is_none(),
            "structural violation: multiple mutation requests from one callback"
        );
        self.op = Some(op);
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Phase {
    Enter,
    Children,
    Leave,
}

#[derive(Debug)]
struct Frame {
    node: NodeId,
    index: usize,
    phase: Phase,
}

/// The traversal engine. Stateless between visits; each
/// [`VisitController::start_visit`] runs exactly one full traversal and
/// returns when the frame stack empties.
#[derive(Default)]
pub struct VisitController {
    stack: SmallVec<[Frame; 16]>,
}

impl VisitController {
    /// Create a controller.
    pub fn new() -> Self {
        VisitController {
            stack: SmallVec::new(),
        }
    }

    /// Traverse the whole tree from its root.
    pub fn start_visit(&mut self, tree: &mut CssTree, visitor: &mut dyn CssTreeVisitor) {
        self.start_visit_from(tree, tree.root(), visitor);
    }

    /// Traverse the subtree rooted at `start`.
    pub fn start_visit_from(
        &mut self,
        tree: &mut CssTree,
        start: NodeId,
        visitor: &mut dyn CssTreeVisitor,
    ) {
        debug_assert!(self.stack.is_empty());
        self.stack.push(Frame {
            node: start,
            index: 0,
            phase: Phase::Enter,
        });

        while !self.stack.is_empty() {
            let top = self.stack.len() - 1;
            let node = self.stack[top].node;
            match self.stack[top].phase {
                Phase::Enter => {
                    let mut mutation = MutationContext::new();
                    let descend = visitor.enter(tree, node, &mut mutation);
                    if let Some(op) = mutation.op.take() {
                        // The entered node is going away; it gets no
                        // children traversal and no leave.
                        self.stack.pop();
                        self.apply(tree, op);
                    } else {
                        self.stack[top].phase =
                            if descend && !tree.children(node).is_empty() {
                                Phase::Children
                            } else {
                                Phase::Leave
                            };
                    }
                }
                Phase::Children => {
                    // Child lists are live: re-read on every step so
                    // splices and removals are observed immediately.
                    let index = self.stack[top].index;
                    let children = tree.children(node);
                    if index < children.len() {
                        let child = children[index];
                        self.stack.push(Frame {
                            node: child,
                            index: 0,
                            phase: Phase::Enter,
                        });
                    } else {
                        self.stack[top].phase = Phase::Leave;
                    }
                }
                Phase::Leave => {
                    self.stack.pop();
                    visitor.leave(tree, node);
                    if let Some(parent) = self.stack.last_mut() {
                        if parent.phase == Phase::Children {
                            parent.index += 1;
                        }
                    }
                }
            }
        }
    }

    /// Apply a mutation request to the innermost children frame.
    fn apply(&mut self, tree: &mut CssTree, op: MutationOp) {
        let Some(frame) = self.stack.last_mut() else {
            panic!("structural violation: cannot mutate the traversal root");
        };
        debug_assert_eq!(frame.phase, Phase::Children);
        match op {
            MutationOp::Remove => {
                tree.remove_child_at(frame.node, frame.index);
                // Index stays put: the old next sibling now sits here.
            }
            MutationOp::Replace {
                replacements,
                visit_replacements,
            } => {
                let len = replacements.len();
                tree.replace_child_at(frame.node, frame.index, &replacements);
                if !visit_replacements {
                    frame.index += len;
                }
                // Otherwise leave the index on the first replacement so
                // the loop visits each one in order before moving past.
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, NodeTag};
    use pretty_assertions::assert_eq;

    /// Records enter/leave events as strings like "enter Literal(a)".
    struct Recorder {
        events: Vec<String>,
    }

    impl Recorder {
        fn new() -> Self {
            Recorder { events: Vec::new() }
        }
    }

    fn describe(tree: &CssTree, node: NodeId) -> String {
        match tree.kind(node) {
            NodeKind::Literal { value } => format!("Literal({value})"),
            other => format!("{:?}", other.tag()),
        }
    }

    impl CssTreeVisitor for Recorder {
        fn enter(
            &mut self,
            tree: &mut CssTree,
            node: NodeId,
            _mutation: &mut MutationContext,
        ) -> bool {
            self.events.push(format!("enter {}", describe(tree, node)));
            true
        }

        fn leave(&mut self, tree: &mut CssTree, node: NodeId) {
            self.events.push(format!("leave {}", describe(tree, node)));
        }
    }

    fn value_with(tree: &mut CssTree, values: &[&str]) -> NodeId {
        let list = tree.alloc(NodeKind::PropertyValue { children: vec![] });
        for value in values {
            let lit = tree.alloc(NodeKind::Literal {
                value: (*value).into(),
            });
            tree.append_child(list, lit);
        }
        list
    }

    #[test]
    fn test_preorder_enter_postorder_leave() {
        let mut tree = CssTree::new();
        let list = value_with(&mut tree, &["a", "b"]);

        let mut recorder = Recorder::new();
        VisitController::new().start_visit_from(&mut tree, list, &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "enter PropertyValue",
                "enter Literal(a)",
                "leave Literal(a)",
                "enter Literal(b)",
                "leave Literal(b)",
                "leave PropertyValue",
            ]
        );
    }

    #[test]
    fn test_enter_false_skips_children_but_leaves() {
        struct SkipLists {
            events: Vec<String>,
        }
        impl CssTreeVisitor for SkipLists {
            fn enter(
                &mut self,
                tree: &mut CssTree,
                node: NodeId,
                _mutation: &mut MutationContext,
            ) -> bool {
                self.events.push(format!("enter {}", describe(tree, node)));
                tree.tag(node) != NodeTag::PropertyValue
            }
            fn leave(&mut self, tree: &mut CssTree, node: NodeId) {
                self.events.push(format!("leave {}", describe(tree, node)));
            }
        }

        let mut tree = CssTree::new();
        let list = value_with(&mut tree, &["a"]);
        let mut visitor = SkipLists { events: vec![] };
        VisitController::new().start_visit_from(&mut tree, list, &mut visitor);
        assert_eq!(
            visitor.events,
            vec!["enter PropertyValue", "leave PropertyValue"]
        );
    }

    /// Removing the current child must not skip its next sibling.
    #[test]
    fn test_remove_current_does_not_skip_sibling() {
        struct RemoveB {
            visited: Vec<String>,
        }
        impl CssTreeVisitor for RemoveB {
            fn enter(
                &mut self,
                tree: &mut CssTree,
                node: NodeId,
                mutation: &mut MutationContext,
            ) -> bool {
                if let NodeKind::Literal { value } = tree.kind(node) {
                    self.visited.push(value.to_string());
                    if &**value == "b" {
                        mutation.remove_current_node();
                    }
                }
                true
            }
        }

        let mut tree = CssTree::new();
        let list = value_with(&mut tree, &["a", "b", "c", "d"]);
        let mut visitor = RemoveB { visited: vec![] };
        VisitController::new().start_visit_from(&mut tree, list, &mut visitor);

        assert_eq!(visitor.visited, vec!["a", "b", "c", "d"]);
        let remaining: Vec<String> = tree
            .children(list)
            .iter()
            .map(|&c| describe(&tree, c))
            .collect();
        assert_eq!(
            remaining,
            vec!["Literal(a)", "Literal(c)", "Literal(d)"]
        );
    }

    #[test]
    fn test_replace_with_visit_visits_replacements_in_order() {
        struct ExpandB {
            events: Vec<String>,
        }
        impl CssTreeVisitor for ExpandB {
            fn enter(
                &mut self,
                tree: &mut CssTree,
                node: NodeId,
                mutation: &mut MutationContext,
            ) -> bool {
                if let NodeKind::Literal { value } = tree.kind(node) {
                    self.events.push(format!("enter {value}"));
                    if &**value == "b" {
                        let r1 = tree.alloc(NodeKind::Literal { value: "r1".into() });
                        let r2 = tree.alloc(NodeKind::Literal { value: "r2".into() });
                        mutation.replace_current_node(vec![r1, r2], true);
                    }
                }
                true
            }
            fn leave(&mut self, tree: &mut CssTree, node: NodeId) {
                if let NodeKind::Literal { value } = tree.kind(node) {
                    self.events.push(format!("leave {value}"));
                }
            }
        }

        let mut tree = CssTree::new();
        let list = value_with(&mut tree, &["a", "b", "c"]);
        let mut visitor = ExpandB { events: vec![] };
        VisitController::new().start_visit_from(&mut tree, list, &mut visitor);

        // r1 then r2 each get enter/leave before traversal resumes at c.
        assert_eq!(
            visitor.events,
            vec![
                "enter a", "leave a", "enter b", "enter r1", "leave r1", "enter r2", "leave r2",
                "enter c", "leave c",
            ]
        );
        let remaining: Vec<String> = tree
            .children(list)
            .iter()
            .map(|&c| describe(&tree, c))
            .collect();
        assert_eq!(
            remaining,
            vec!["Literal(a)", "Literal(r1)", "Literal(r2)", "Literal(c)"]
        );
    }

    #[test]
    fn test_replace_without_visit_skips_replacements() {
        struct ExpandQuiet {
            entered: Vec<String>,
        }
        impl CssTreeVisitor for ExpandQuiet {
            fn enter(
                &mut self,
                tree: &mut CssTree,
                node: NodeId,
                mutation: &mut MutationContext,
            ) -> bool {
                if let NodeKind::Literal { value } = tree.kind(node) {
                    self.entered.push(value.to_string());
                    if &**value == "b" {
                        let r = tree.alloc(NodeKind::Literal { value: "r".into() });
                        mutation.replace_current_node(vec![r], false);
                    }
                }
                true
            }
        }

        let mut tree = CssTree::new();
        let list = value_with(&mut tree, &["a", "b", "c"]);
        let mut visitor = ExpandQuiet { entered: vec![] };
        VisitController::new().start_visit_from(&mut tree, list, &mut visitor);

        assert_eq!(visitor.entered, vec!["a", "b", "c"]);
    }

    #[test]
    #[should_panic(expected = "cannot mutate the traversal root")]
    fn test_mutating_root_panics() {
        struct RemoveRoot;
        impl CssTreeVisitor for RemoveRoot {
            fn enter(
                &mut self,
                _tree: &mut CssTree,
                _node: NodeId,
                mutation: &mut MutationContext,
            ) -> bool {
                mutation.remove_current_node();
                true
            }
        }

        let mut tree = CssTree::new();
        VisitController::new().start_visit(&mut tree, &mut RemoveRoot);
    }
}
