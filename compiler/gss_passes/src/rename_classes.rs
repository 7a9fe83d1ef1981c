//! Class renaming.
//!
//! The final rewrite: every `ClassSelector` name goes through a
//! [`SubstitutionMap`]. The map decides the policy (identity, minimal,
//! recording, ...); this pass only applies it.

use std::sync::Arc;

use tracing::debug;

use gss_ir::{CssTree, CssTreeVisitor, MutationContext, NodeId, NodeKind, VisitController};
use gss_subst::SubstitutionMap;

use crate::Pass;

/// Renames class selectors through a substitution map.
pub struct RenameCssClasses<'a> {
    map: &'a mut dyn SubstitutionMap,
    renamed: usize,
}

impl<'a> RenameCssClasses<'a> {
    pub fn new(map: &'a mut dyn SubstitutionMap) -> Self {
        RenameCssClasses { map, renamed: 0 }
    }
}

impl CssTreeVisitor for RenameCssClasses<'_> {
    fn enter(&mut self, tree: &mut CssTree, node: NodeId, _mutation: &mut MutationContext) -> bool {
        let NodeKind::ClassSelector { name } = tree.kind(node) else {
            return true;
        };
        let original = Arc::clone(name);
        let renamed = self.map.get(&original);
        let NodeKind::ClassSelector { name } = tree.kind_mut(node) else {
            unreachable!();
        };
        *name = renamed;
        self.renamed += 1;
        false
    }
}

impl Pass for RenameCssClasses<'_> {
    fn run(&mut self, tree: &mut CssTree) {
        VisitController::new().start_visit(tree, self);
        debug!(renamed = self.renamed, "renamed class selectors");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gss_subst::SimpleSubstitutionMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_renames_class_selectors() {
        let mut tree = CssTree::new();
        let ruleset = tree.alloc(NodeKind::Ruleset { children: vec![] });
        let selectors = tree.alloc(NodeKind::SelectorList { children: vec![] });
        let selector = tree.alloc(NodeKind::Selector {
            element: None,
            children: vec![],
        });
        let class = tree.alloc(NodeKind::ClassSelector {
            name: "CSS_FOO".into(),
        });
        tree.append_child(selector, class);
        tree.append_child(selectors, selector);
        tree.append_child(ruleset, selectors);
        let block = tree.alloc(NodeKind::DeclarationBlock { children: vec![] });
        tree.append_child(ruleset, block);
        let body = tree.body();
        tree.append_child(body, ruleset);

        let mut map = SimpleSubstitutionMap::new();
        RenameCssClasses::new(&mut map).run(&mut tree);

        let NodeKind::ClassSelector { name } = tree.kind(class) else {
            panic!("expected a class selector");
        };
        assert_eq!(&**name, "CSS_FOO_");
    }
}
