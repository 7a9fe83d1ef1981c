//! End-to-end pass-sequence tests over hand-built trees, standing in
//! for parser output.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

use gss_diagnostic::{AccumulatingErrorManager, ErrorManager};
use gss_ir::{BooleanOp, ConditionalKind, CssTree, NodeId, NodeKind};
use gss_passes::{PassOptions, PassRunner};
use gss_subst::{RecordingSubstitutionMap, SimpleSubstitutionMap};

/// `@def NAME values...;` as the parser would leave it: an unknown
/// at-rule with literal parameters.
fn def_at_rule(tree: &mut CssTree, params: &[&str]) {
    let rule = tree.alloc(NodeKind::UnknownAtRule {
        name: "def".into(),
        children: vec![],
    });
    for param in params {
        let lit = tree.alloc(NodeKind::Literal {
            value: (*param).into(),
        });
        tree.append_child(rule, lit);
    }
    let body = tree.body();
    tree.append_child(body, rule);
}

/// `.class { property: <value>; }`; the value is a constant reference
/// when `reference` is true, a literal otherwise. Returns the
/// declaration's `PropertyValue`.
fn ruleset(
    tree: &mut CssTree,
    class: &str,
    property: &str,
    value_text: &str,
    reference: bool,
) -> NodeId {
    let ruleset = tree.alloc(NodeKind::Ruleset { children: vec![] });
    let selectors = tree.alloc(NodeKind::SelectorList { children: vec![] });
    let selector = tree.alloc(NodeKind::Selector {
        element: None,
        children: vec![],
    });
    let class_node = tree.alloc(NodeKind::ClassSelector { name: class.into() });
    tree.append_child(selector, class_node);
    tree.append_child(selectors, selector);
    tree.append_child(ruleset, selectors);

    let block = tree.alloc(NodeKind::DeclarationBlock { children: vec![] });
    let declaration = tree.alloc(NodeKind::Declaration {
        property: property.into(),
        children: vec![],
    });
    let value = tree.alloc(NodeKind::PropertyValue { children: vec![] });
    let inner = if reference {
        tree.alloc(NodeKind::ConstantReference {
            name: value_text.into(),
        })
    } else {
        tree.alloc(NodeKind::Literal {
            value: value_text.into(),
        })
    };
    tree.append_child(value, inner);
    tree.append_child(declaration, value);
    tree.append_child(block, declaration);
    tree.append_child(ruleset, block);

    let body = tree.body();
    tree.append_child(body, ruleset);
    value
}

/// First class selector name of the `n`-th ruleset under the body.
fn class_name(tree: &CssTree, n: usize) -> String {
    let ruleset = tree.children(tree.body())[n];
    let selectors = tree.children(ruleset)[0];
    let selector = tree.children(selectors)[0];
    let class = tree.children(selector)[0];
    let NodeKind::ClassSelector { name } = tree.kind(class) else {
        panic!("expected a class selector");
    };
    name.to_string()
}

fn value_literals(tree: &CssTree, value: NodeId) -> Vec<String> {
    tree.children(value)
        .iter()
        .map(|&v| match tree.kind(v) {
            NodeKind::Literal { value } => value.to_string(),
            other => format!("{:?}", other.tag()),
        })
        .collect()
}

fn run(tree: &mut CssTree, options: PassOptions) -> AccumulatingErrorManager {
    let mut errors = AccumulatingErrorManager::new();
    PassRunner::new(options).run(tree, &mut errors, None);
    errors
}

#[test]
fn test_constant_definition_and_use() {
    // @def COLOR red; .a { color: COLOR; }  =>  .a { color: red; }
    let mut tree = CssTree::new();
    def_at_rule(&mut tree, &["COLOR", "red"]);
    let value = ruleset(&mut tree, "a", "color", "COLOR", true);

    let errors = run(&mut tree, PassOptions::default());
    assert!(!errors.has_errors());
    assert_eq!(value_literals(&tree, value), vec!["red"]);
    // The @def is gone; only the ruleset remains.
    assert_eq!(tree.children(tree.body()).len(), 1);
}

#[test]
fn test_chained_constants_resolve_through() {
    let mut tree = CssTree::new();
    def_at_rule(&mut tree, &["BASE", "red"]);
    def_at_rule(&mut tree, &["COLOR", "BASE"]);
    // The parser leaves uppercase value words as literals; the
    // reference node is what matters, so build it directly.
    let body = tree.body();
    let def = tree.children(body)[1];
    let old_value = tree.children(def)[1];
    tree.remove_child(def, old_value);
    let reference = tree.alloc(NodeKind::ConstantReference {
        name: "BASE".into(),
    });
    tree.append_child(def, reference);

    let value = ruleset(&mut tree, "a", "color", "COLOR", true);

    let errors = run(&mut tree, PassOptions::default());
    assert!(!errors.has_errors());
    assert_eq!(value_literals(&tree, value), vec!["red"]);
}

#[test]
fn test_conditional_if_branch_with_true_condition() {
    // @if COND { .a {} } @else { .b {} } with COND true  =>  .a {}
    let mut tree = CssTree::new();
    let chain = tree.alloc(NodeKind::ConditionalBlock { children: vec![] });

    let if_rule = tree.alloc(NodeKind::ConditionalRule {
        kind: ConditionalKind::If,
        children: vec![],
    });
    let cond = tree.alloc(NodeKind::BooleanExpression {
        op: BooleanOp::Constant("COND".into()),
        children: vec![],
    });
    tree.append_child(if_rule, cond);
    let if_body = tree.alloc(NodeKind::Body { children: vec![] });
    tree.append_child(if_rule, if_body);
    tree.append_child(chain, if_rule);

    let else_rule = tree.alloc(NodeKind::ConditionalRule {
        kind: ConditionalKind::Else,
        children: vec![],
    });
    let else_body = tree.alloc(NodeKind::Body { children: vec![] });
    tree.append_child(else_rule, else_body);
    tree.append_child(chain, else_rule);

    let body = tree.body();
    tree.append_child(body, chain);

    // Branch contents: .a in the if branch, .b in the else branch. Built
    // through ruleset() under the body, then moved into the branches.
    ruleset(&mut tree, "a", "color", "red", false);
    ruleset(&mut tree, "b", "color", "blue", false);
    let a = tree.children(tree.body())[1];
    let b = tree.children(tree.body())[2];
    tree.remove_child(body, a);
    tree.remove_child(body, b);
    tree.append_child(if_body, a);
    tree.append_child(else_body, b);

    let mut true_conditions: FxHashSet<Arc<str>> = FxHashSet::default();
    true_conditions.insert(Arc::from("COND"));
    let errors = run(
        &mut tree,
        PassOptions {
            true_conditions,
            ..PassOptions::default()
        },
    );
    assert!(!errors.has_errors());
    assert_eq!(tree.children(tree.body()).len(), 1);
    assert_eq!(class_name(&tree, 0), "a");

    // Same tree shape with no true conditions takes the else branch.
    let mut tree = CssTree::new();
    let chain = tree.alloc(NodeKind::ConditionalBlock { children: vec![] });
    let if_rule = tree.alloc(NodeKind::ConditionalRule {
        kind: ConditionalKind::If,
        children: vec![],
    });
    let cond = tree.alloc(NodeKind::BooleanExpression {
        op: BooleanOp::Constant("COND".into()),
        children: vec![],
    });
    tree.append_child(if_rule, cond);
    let if_body = tree.alloc(NodeKind::Body { children: vec![] });
    tree.append_child(if_rule, if_body);
    tree.append_child(chain, if_rule);
    let else_rule = tree.alloc(NodeKind::ConditionalRule {
        kind: ConditionalKind::Else,
        children: vec![],
    });
    let else_body = tree.alloc(NodeKind::Body { children: vec![] });
    tree.append_child(else_rule, else_body);
    tree.append_child(chain, else_rule);
    let body = tree.body();
    tree.append_child(body, chain);
    ruleset(&mut tree, "a", "color", "red", false);
    ruleset(&mut tree, "b", "color", "blue", false);
    let a = tree.children(tree.body())[1];
    let b = tree.children(tree.body())[2];
    tree.remove_child(body, a);
    tree.remove_child(body, b);
    tree.append_child(if_body, a);
    tree.append_child(else_body, b);

    let errors = run(&mut tree, PassOptions::default());
    assert!(!errors.has_errors());
    assert_eq!(tree.children(tree.body()).len(), 1);
    assert_eq!(class_name(&tree, 0), "b");
}

#[test]
fn test_constant_defined_inside_surviving_branch() {
    // A @def nested in a conditional branch is collected before the
    // branch is eliminated; the latest definition wins.
    let mut tree = CssTree::new();
    def_at_rule(&mut tree, &["COLOR", "red"]);

    let chain = tree.alloc(NodeKind::ConditionalBlock { children: vec![] });
    let if_rule = tree.alloc(NodeKind::ConditionalRule {
        kind: ConditionalKind::If,
        children: vec![],
    });
    let cond = tree.alloc(NodeKind::BooleanExpression {
        op: BooleanOp::Constant("OVERRIDE".into()),
        children: vec![],
    });
    tree.append_child(if_rule, cond);
    let branch = tree.alloc(NodeKind::Body { children: vec![] });
    let nested_def = tree.alloc(NodeKind::UnknownAtRule {
        name: "def".into(),
        children: vec![],
    });
    for text in ["COLOR", "blue"] {
        let lit = tree.alloc(NodeKind::Literal { value: text.into() });
        tree.append_child(nested_def, lit);
    }
    tree.append_child(branch, nested_def);
    tree.append_child(if_rule, branch);
    tree.append_child(chain, if_rule);
    let body = tree.body();
    tree.append_child(body, chain);

    let value = ruleset(&mut tree, "a", "color", "COLOR", true);

    let mut true_conditions: FxHashSet<Arc<str>> = FxHashSet::default();
    true_conditions.insert(Arc::from("OVERRIDE"));
    let errors = run(
        &mut tree,
        PassOptions {
            true_conditions,
            ..PassOptions::default()
        },
    );
    assert!(!errors.has_errors());
    assert_eq!(value_literals(&tree, value), vec!["blue"]);
}

#[test]
fn test_class_renaming_with_recording_map() {
    // .CSS_FOO {} renamed by a CSS_-predicate recording/simple stack
    // becomes .CSS_FOO_ {}, and the mapping is logged.
    let mut tree = CssTree::new();
    ruleset(&mut tree, "CSS_FOO", "color", "red", false);
    ruleset(&mut tree, "plain", "color", "blue", false);

    let mut map =
        RecordingSubstitutionMap::new(SimpleSubstitutionMap::new(), |key| key.starts_with("CSS_"));
    let mut errors = AccumulatingErrorManager::new();
    PassRunner::new(PassOptions::default()).run(&mut tree, &mut errors, Some(&mut map));

    assert!(!errors.has_errors());
    assert_eq!(class_name(&tree, 0), "CSS_FOO_");
    assert_eq!(class_name(&tree, 1), "plain_");
    let recorded: Vec<(String, String)> = map
        .mappings()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(
        recorded,
        vec![("CSS_FOO".to_string(), "CSS_FOO_".to_string())]
    );
}

#[test]
fn test_mixin_definition_and_use() {
    // @defmixin tint(COLOR) { color: COLOR }  +  @mixin tint(green)
    let mut tree = CssTree::new();
    let def = tree.alloc(NodeKind::MixinDefinition {
        name: "tint".into(),
        params: vec![Arc::from("COLOR")],
        children: vec![],
    });
    let def_block = tree.alloc(NodeKind::DeclarationBlock { children: vec![] });
    let declaration = tree.alloc(NodeKind::Declaration {
        property: "color".into(),
        children: vec![],
    });
    let def_value = tree.alloc(NodeKind::PropertyValue { children: vec![] });
    let param_ref = tree.alloc(NodeKind::ConstantReference {
        name: "COLOR".into(),
    });
    tree.append_child(def_value, param_ref);
    tree.append_child(declaration, def_value);
    tree.append_child(def_block, declaration);
    tree.append_child(def, def_block);
    let body = tree.body();
    tree.append_child(body, def);

    ruleset(&mut tree, "a", "margin", "0", false);
    let ruleset_node = tree.children(tree.body())[1];
    let block = tree.children(ruleset_node)[1];
    let mixin = tree.alloc(NodeKind::Mixin {
        name: "tint".into(),
        children: vec![],
    });
    let arguments = tree.alloc(NodeKind::FunctionArguments { children: vec![] });
    let arg = tree.alloc(NodeKind::Literal {
        value: "green".into(),
    });
    tree.append_child(arguments, arg);
    tree.append_child(mixin, arguments);
    tree.append_child(block, mixin);

    let errors = run(&mut tree, PassOptions::default());
    assert!(!errors.has_errors());

    // The mixin use became a copied declaration with the argument
    // substituted; the @defmixin is gone.
    assert_eq!(tree.children(tree.body()).len(), 1);
    let declarations = tree.children(block);
    assert_eq!(declarations.len(), 2);
    let expanded = declarations[1];
    let NodeKind::Declaration { property, .. } = tree.kind(expanded) else {
        panic!("expected a declaration");
    };
    assert_eq!(&**property, "color");
    let value = tree.children(expanded)[0];
    assert_eq!(value_literals(&tree, value), vec!["green"]);
}

#[test]
fn test_undefined_constant_with_allow_option() {
    let mut tree = CssTree::new();
    let value = ruleset(&mut tree, "a", "color", "MISSING", true);

    let errors = run(
        &mut tree,
        PassOptions {
            allow_undefined_constants: true,
            ..PassOptions::default()
        },
    );
    assert!(!errors.has_errors());
    assert_eq!(value_literals(&tree, value), vec!["ConstantReference"]);

    let mut tree = CssTree::new();
    let value = ruleset(&mut tree, "a", "color", "MISSING", true);
    let errors = run(&mut tree, PassOptions::default());
    assert_eq!(errors.error_count(), 1);
    assert!(tree.children(value).is_empty());
}
