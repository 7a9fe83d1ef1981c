//! GSS Passes - the rewrite passes and their runner.
//!
//! A [`Pass`] performs one visit-controller traversal (or a small fixed
//! number) over the tree and returns; anything it learns is published
//! explicitly (collected tables), never through ambient state. Passes are
//! single-use: most destructively consume the constructs they resolve
//! (`@def` and `@defmixin` nodes are removed once substituted) and must
//! not be re-run on their own output.
//!
//! [`PassRunner`] composes them in the fixed dependency order:
//! definition creation → constant and mixin collection → constant
//! substitution → mixin expansion → conditional elimination → renaming.

mod bool_expr;
mod collect_constants;
mod collect_mixins;
mod create_definitions;
mod eliminate_conditionals;
mod rename_classes;
mod replace_constants;
mod replace_mixins;

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::debug;

use gss_diagnostic::ErrorManager;
use gss_ir::CssTree;
use gss_subst::SubstitutionMap;

pub use bool_expr::{evaluate, simplify, TruthAssignment, TruthValue};
pub use collect_constants::{CollectConstantDefinitions, ConstantDefinitions};
pub use collect_mixins::{CollectMixinDefinitions, MixinDefinitions};
pub use create_definitions::CreateDefinitionNodes;
pub use eliminate_conditionals::EliminateConditionals;
pub use rename_classes::RenameCssClasses;
pub use replace_constants::ReplaceConstantReferences;
pub use replace_mixins::ReplaceMixins;

/// One self-contained tree analysis/rewrite step.
pub trait Pass {
    /// Run the pass against the tree.
    fn run(&mut self, tree: &mut CssTree);
}

/// Options controlling a pass sequence.
#[derive(Default)]
pub struct PassOptions {
    /// Condition names treated as true during conditional elimination;
    /// everything else is false.
    pub true_conditions: FxHashSet<Arc<str>>,
    /// Leave references to undefined constants untouched instead of
    /// reporting them.
    pub allow_undefined_constants: bool,
}

/// Runs the full pass sequence in dependency order.
pub struct PassRunner {
    options: PassOptions,
}

impl PassRunner {
    pub fn new(options: PassOptions) -> Self {
        PassRunner { options }
    }

    /// Rewrite `tree` in place: resolve definitions, constants, mixins
    /// and conditionals, then rename classes through `renaming` if one
    /// is supplied.
    pub fn run(
        &self,
        tree: &mut CssTree,
        errors: &mut dyn ErrorManager,
        renaming: Option<&mut dyn SubstitutionMap>,
    ) {
        debug!("running pass sequence");
        CreateDefinitionNodes::new(errors).run(tree);

        let constants = {
            let mut pass = CollectConstantDefinitions::new();
            pass.run(tree);
            pass.into_definitions()
        };
        let mixins = {
            let mut pass = CollectMixinDefinitions::new(errors);
            pass.run(tree);
            pass.into_definitions()
        };

        ReplaceConstantReferences::new(
            constants,
            self.options.allow_undefined_constants,
            errors,
        )
        .run(tree);
        ReplaceMixins::new(mixins, errors).run(tree);

        let assignment = TruthAssignment::closed(self.options.true_conditions.clone());
        EliminateConditionals::new(assignment).run(tree);

        if let Some(map) = renaming {
            RenameCssClasses::new(map).run(tree);
        }
    }
}
