//! Node variants for the CSS tree.
//!
//! `NodeKind` is the closed sum over every construct the compiler
//! understands: plain CSS (rulesets, selectors, declarations, values) and
//! the GSS extensions (definitions, conditionals, mixins, components,
//! for-loops). Container variants own their children as `Vec<NodeId>`
//! lists; every container declares an allow-list of acceptable child
//! tags, checked at insertion time.

use std::fmt;
use std::sync::Arc;

use crate::node_id::NodeId;

bitflags::bitflags! {
    /// Per-node boolean flags, carried through deep copies.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
    pub struct NodeFlags: u8 {
        /// The value came from a `@def ... default` definition.
        const IS_DEFAULT = 1 << 0;
        /// Star-hack declaration (`*property: value`).
        const STAR_HACK = 1 << 1;
        /// Marked for left-right flipping by a BiDi pass.
        const SHOULD_BE_FLIPPED = 1 << 2;
    }
}

/// Selector combinators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Combinator {
    /// Whitespace: `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    AdjacentSibling,
    /// `a ~ b`
    GeneralSibling,
}

/// Which rule of a conditional chain a `ConditionalRule` node is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConditionalKind {
    If,
    ElseIf,
    Else,
}

/// Boolean expression operators for `@if` conditions.
///
/// `Constant` is a leaf naming a truth condition; `True` and `False` are
/// the resolved literals produced by simplification.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum BooleanOp {
    Constant(Arc<str>),
    True,
    False,
    Not,
    And,
    Or,
}

/// The closed set of node variants.
///
/// Container variants carry a `children` list; leaf variants carry only
/// data. Children are arena indices, never boxes.
#[derive(Clone, PartialEq, Debug)]
pub enum NodeKind {
    // Structure
    /// Stylesheet root: one import block followed by one body.
    Root { children: Vec<NodeId> },
    /// All `@import` rules of the stylesheet.
    ImportBlock { children: Vec<NodeId> },
    /// A single `@import` rule; children are its parameter values.
    ImportRule { children: Vec<NodeId> },
    /// Top-level (or component/conditional-branch) rule container.
    Body { children: Vec<NodeId> },
    /// Selector list plus declaration block.
    Ruleset { children: Vec<NodeId> },
    /// `@media` rule: parameter values followed by a body.
    MediaRule { children: Vec<NodeId> },
    /// `@keyframes` rule.
    Keyframes { name: Arc<str>, children: Vec<NodeId> },
    /// An at-rule the parser did not recognize.
    UnknownAtRule { name: Arc<str>, children: Vec<NodeId> },

    // Selectors
    /// Comma-separated selectors of a ruleset.
    SelectorList { children: Vec<NodeId> },
    /// One selector: optional element name plus refiners/combinator.
    Selector {
        element: Option<Arc<str>>,
        children: Vec<NodeId>,
    },
    /// `.name`
    ClassSelector { name: Arc<str> },
    /// `#name`
    IdSelector { name: Arc<str> },
    /// `:name`
    PseudoClass { name: Arc<str> },
    /// `::name`
    PseudoElement { name: Arc<str> },
    /// `[expr]`, stored as raw text.
    AttributeSelector { expression: Arc<str> },
    /// Combinator linking to the next selector in the chain.
    Combinator {
        combinator: Combinator,
        children: Vec<NodeId>,
    },

    // Declarations
    /// `{ ... }` of a ruleset.
    DeclarationBlock { children: Vec<NodeId> },
    /// `property: value`; the star-hack flag lives on the node.
    Declaration {
        property: Arc<str>,
        children: Vec<NodeId>,
    },
    /// The value side of a declaration.
    PropertyValue { children: Vec<NodeId> },

    // Values
    /// Bare identifier or keyword value.
    Literal { value: Arc<str> },
    /// Number with optional unit, kept as source text.
    Numeric {
        value: Arc<str>,
        unit: Option<Arc<str>>,
    },
    /// `#rrggbb`
    HexColor { value: Arc<str> },
    /// Quoted string.
    StringLiteral { value: Arc<str> },
    /// Function application; single child is the argument list.
    Function { name: Arc<str>, children: Vec<NodeId> },
    /// Arguments of a function, values and separators in order.
    FunctionArguments { children: Vec<NodeId> },
    /// `,` between function arguments.
    ArgumentSeparator,
    /// Reference to a `@def` constant (or mixin parameter).
    ConstantReference { name: Arc<str> },

    // GSS extensions
    /// `@def NAME value...;`
    Definition { name: Arc<str>, children: Vec<NodeId> },
    /// An `@if`/`@elseif`/`@else` chain.
    ConditionalBlock { children: Vec<NodeId> },
    /// One branch of a conditional chain: condition (unless `Else`)
    /// followed by its block.
    ConditionalRule {
        kind: ConditionalKind,
        children: Vec<NodeId>,
    },
    /// Boolean condition expression tree.
    BooleanExpression {
        op: BooleanOp,
        children: Vec<NodeId>,
    },
    /// `@defmixin name(PARAM, ...) { ... }`
    MixinDefinition {
        name: Arc<str>,
        params: Vec<Arc<str>>,
        children: Vec<NodeId>,
    },
    /// `@mixin name(arg, ...);` inside a declaration block.
    Mixin { name: Arc<str>, children: Vec<NodeId> },
    /// `@component name [extends parent] { ... }`
    Component {
        name: Arc<str>,
        extends: Option<Arc<str>>,
        children: Vec<NodeId>,
    },
    /// `@for VAR from a to b [step c] { ... }`
    ForLoop {
        variable: Arc<str>,
        children: Vec<NodeId>,
    },
}

/// Fieldless mirror of [`NodeKind`], used for allow-list checks and
/// dispatch tables.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeTag {
    Root,
    ImportBlock,
    ImportRule,
    Body,
    Ruleset,
    MediaRule,
    Keyframes,
    UnknownAtRule,
    SelectorList,
    Selector,
    ClassSelector,
    IdSelector,
    PseudoClass,
    PseudoElement,
    AttributeSelector,
    Combinator,
    DeclarationBlock,
    Declaration,
    PropertyValue,
    Literal,
    Numeric,
    HexColor,
    StringLiteral,
    Function,
    FunctionArguments,
    ArgumentSeparator,
    ConstantReference,
    Definition,
    ConditionalBlock,
    ConditionalRule,
    BooleanExpression,
    MixinDefinition,
    Mixin,
    Component,
    ForLoop,
}

/// Tags acceptable wherever a CSS value is expected.
const VALUE_TAGS: &[NodeTag] = &[
    NodeTag::Literal,
    NodeTag::Numeric,
    NodeTag::HexColor,
    NodeTag::StringLiteral,
    NodeTag::Function,
    NodeTag::ConstantReference,
];

const ROOT_CHILDREN: &[NodeTag] = &[NodeTag::ImportBlock, NodeTag::Body];
const IMPORT_BLOCK_CHILDREN: &[NodeTag] = &[NodeTag::ImportRule];
const BODY_CHILDREN: &[NodeTag] = &[
    NodeTag::Ruleset,
    NodeTag::MediaRule,
    NodeTag::Keyframes,
    NodeTag::UnknownAtRule,
    NodeTag::Definition,
    NodeTag::ConditionalBlock,
    NodeTag::MixinDefinition,
    NodeTag::Component,
    NodeTag::ForLoop,
];
const RULESET_CHILDREN: &[NodeTag] = &[NodeTag::SelectorList, NodeTag::DeclarationBlock];
const MEDIA_CHILDREN: &[NodeTag] = &[
    NodeTag::Literal,
    NodeTag::Numeric,
    NodeTag::HexColor,
    NodeTag::StringLiteral,
    NodeTag::Function,
    NodeTag::ConstantReference,
    NodeTag::Body,
];
const KEYFRAMES_CHILDREN: &[NodeTag] = &[NodeTag::Body];
const UNKNOWN_AT_RULE_CHILDREN: &[NodeTag] = &[
    NodeTag::Literal,
    NodeTag::Numeric,
    NodeTag::HexColor,
    NodeTag::StringLiteral,
    NodeTag::Function,
    NodeTag::ConstantReference,
    NodeTag::Body,
    NodeTag::DeclarationBlock,
];
const SELECTOR_LIST_CHILDREN: &[NodeTag] = &[NodeTag::Selector];
const SELECTOR_CHILDREN: &[NodeTag] = &[
    NodeTag::ClassSelector,
    NodeTag::IdSelector,
    NodeTag::PseudoClass,
    NodeTag::PseudoElement,
    NodeTag::AttributeSelector,
    NodeTag::Combinator,
];
const COMBINATOR_CHILDREN: &[NodeTag] = &[NodeTag::Selector];
const DECLARATION_BLOCK_CHILDREN: &[NodeTag] = &[
    NodeTag::Declaration,
    NodeTag::Mixin,
    NodeTag::ConditionalBlock,
];
const DECLARATION_CHILDREN: &[NodeTag] = &[NodeTag::PropertyValue];
const FUNCTION_CHILDREN: &[NodeTag] = &[NodeTag::FunctionArguments];
const FUNCTION_ARGUMENTS_CHILDREN: &[NodeTag] = &[
    NodeTag::Literal,
    NodeTag::Numeric,
    NodeTag::HexColor,
    NodeTag::StringLiteral,
    NodeTag::Function,
    NodeTag::ConstantReference,
    NodeTag::ArgumentSeparator,
];
const CONDITIONAL_BLOCK_CHILDREN: &[NodeTag] = &[NodeTag::ConditionalRule];
const CONDITIONAL_RULE_CHILDREN: &[NodeTag] = &[
    NodeTag::BooleanExpression,
    NodeTag::Body,
    NodeTag::DeclarationBlock,
];
const BOOLEAN_EXPRESSION_CHILDREN: &[NodeTag] = &[NodeTag::BooleanExpression];
const MIXIN_DEFINITION_CHILDREN: &[NodeTag] = &[NodeTag::DeclarationBlock];
const MIXIN_CHILDREN: &[NodeTag] = &[NodeTag::FunctionArguments];
const COMPONENT_CHILDREN: &[NodeTag] = &[NodeTag::Body];
const FOR_LOOP_CHILDREN: &[NodeTag] = &[
    NodeTag::Literal,
    NodeTag::Numeric,
    NodeTag::HexColor,
    NodeTag::StringLiteral,
    NodeTag::Function,
    NodeTag::ConstantReference,
    NodeTag::Body,
];

impl NodeTag {
    /// The allow-list of child tags for this container, or `None` for
    /// leaf variants that accept no children at all.
    pub fn allowed_children(self) -> Option<&'static [NodeTag]> {
        match self {
            NodeTag::Root => Some(ROOT_CHILDREN),
            NodeTag::ImportBlock => Some(IMPORT_BLOCK_CHILDREN),
            NodeTag::ImportRule => Some(VALUE_TAGS),
            NodeTag::Body => Some(BODY_CHILDREN),
            NodeTag::Ruleset => Some(RULESET_CHILDREN),
            NodeTag::MediaRule => Some(MEDIA_CHILDREN),
            NodeTag::Keyframes => Some(KEYFRAMES_CHILDREN),
            NodeTag::UnknownAtRule => Some(UNKNOWN_AT_RULE_CHILDREN),
            NodeTag::SelectorList => Some(SELECTOR_LIST_CHILDREN),
            NodeTag::Selector => Some(SELECTOR_CHILDREN),
            NodeTag::Combinator => Some(COMBINATOR_CHILDREN),
            NodeTag::DeclarationBlock => Some(DECLARATION_BLOCK_CHILDREN),
            NodeTag::Declaration => Some(DECLARATION_CHILDREN),
            NodeTag::PropertyValue => Some(VALUE_TAGS),
            NodeTag::Function => Some(FUNCTION_CHILDREN),
            NodeTag::FunctionArguments => Some(FUNCTION_ARGUMENTS_CHILDREN),
            NodeTag::Definition => Some(VALUE_TAGS),
            NodeTag::ConditionalBlock => Some(CONDITIONAL_BLOCK_CHILDREN),
            NodeTag::ConditionalRule => Some(CONDITIONAL_RULE_CHILDREN),
            NodeTag::BooleanExpression => Some(BOOLEAN_EXPRESSION_CHILDREN),
            NodeTag::MixinDefinition => Some(MIXIN_DEFINITION_CHILDREN),
            NodeTag::Mixin => Some(MIXIN_CHILDREN),
            NodeTag::Component => Some(COMPONENT_CHILDREN),
            NodeTag::ForLoop => Some(FOR_LOOP_CHILDREN),
            NodeTag::ClassSelector
            | NodeTag::IdSelector
            | NodeTag::PseudoClass
            | NodeTag::PseudoElement
            | NodeTag::AttributeSelector
            | NodeTag::Literal
            | NodeTag::Numeric
            | NodeTag::HexColor
            | NodeTag::StringLiteral
            | NodeTag::ArgumentSeparator
            | NodeTag::ConstantReference => None,
        }
    }

    /// Whether `child` may be inserted into a container of this tag.
    pub fn accepts_child(self, child: NodeTag) -> bool {
        self.allowed_children()
            .is_some_and(|allowed| allowed.contains(&child))
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl NodeKind {
    /// The tag of this variant.
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Root { .. } => NodeTag::Root,
            NodeKind::ImportBlock { .. } => NodeTag::ImportBlock,
            NodeKind::ImportRule { .. } => NodeTag::ImportRule,
            NodeKind::Body { .. } => NodeTag::Body,
            NodeKind::Ruleset { .. } => NodeTag::Ruleset,
            NodeKind::MediaRule { .. } => NodeTag::MediaRule,
            NodeKind::Keyframes { .. } => NodeTag::Keyframes,
            NodeKind::UnknownAtRule { .. } => NodeTag::UnknownAtRule,
            NodeKind::SelectorList { .. } => NodeTag::SelectorList,
            NodeKind::Selector { .. } => NodeTag::Selector,
            NodeKind::ClassSelector { .. } => NodeTag::ClassSelector,
            NodeKind::IdSelector { .. } => NodeTag::IdSelector,
            NodeKind::PseudoClass { .. } => NodeTag::PseudoClass,
            NodeKind::PseudoElement { .. } => NodeTag::PseudoElement,
            NodeKind::AttributeSelector { .. } => NodeTag::AttributeSelector,
            NodeKind::Combinator { .. } => NodeTag::Combinator,
            NodeKind::DeclarationBlock { .. } => NodeTag::DeclarationBlock,
            NodeKind::Declaration { .. } => NodeTag::Declaration,
            NodeKind::PropertyValue { .. } => NodeTag::PropertyValue,
            NodeKind::Literal { .. } => NodeTag::Literal,
            NodeKind::Numeric { .. } => NodeTag::Numeric,
            NodeKind::HexColor { .. } => NodeTag::HexColor,
            NodeKind::StringLiteral { .. } => NodeTag::StringLiteral,
            NodeKind::Function { .. } => NodeTag::Function,
            NodeKind::FunctionArguments { .. } => NodeTag::FunctionArguments,
            NodeKind::ArgumentSeparator => NodeTag::ArgumentSeparator,
            NodeKind::ConstantReference { .. } => NodeTag::ConstantReference,
            NodeKind::Definition { .. } => NodeTag::Definition,
            NodeKind::ConditionalBlock { .. } => NodeTag::ConditionalBlock,
            NodeKind::ConditionalRule { .. } => NodeTag::ConditionalRule,
            NodeKind::BooleanExpression { .. } => NodeTag::BooleanExpression,
            NodeKind::MixinDefinition { .. } => NodeTag::MixinDefinition,
            NodeKind::Mixin { .. } => NodeTag::Mixin,
            NodeKind::Component { .. } => NodeTag::Component,
            NodeKind::ForLoop { .. } => NodeTag::ForLoop,
        }
    }

    /// The child list of this node; empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match self.children_vec() {
            Some(children) => children,
            None => &[],
        }
    }

    /// Mutable access to the child list, or `None` for leaves.
    pub(crate) fn children_vec_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Root { children }
            | NodeKind::ImportBlock { children }
            | NodeKind::ImportRule { children }
            | NodeKind::Body { children }
            | NodeKind::Ruleset { children }
            | NodeKind::MediaRule { children }
            | NodeKind::Keyframes { children, .. }
            | NodeKind::UnknownAtRule { children, .. }
            | NodeKind::SelectorList { children }
            | NodeKind::Selector { children, .. }
            | NodeKind::Combinator { children, .. }
            | NodeKind::DeclarationBlock { children }
            | NodeKind::Declaration { children, .. }
            | NodeKind::PropertyValue { children }
            | NodeKind::Function { children, .. }
            | NodeKind::FunctionArguments { children }
            | NodeKind::Definition { children, .. }
            | NodeKind::ConditionalBlock { children }
            | NodeKind::ConditionalRule { children, .. }
            | NodeKind::BooleanExpression { children, .. }
            | NodeKind::MixinDefinition { children, .. }
            | NodeKind::Mixin { children, .. }
            | NodeKind::Component { children, .. }
            | NodeKind::ForLoop { children, .. } => Some(children),
            NodeKind::ClassSelector { .. }
            | NodeKind::IdSelector { .. }
            | NodeKind::PseudoClass { .. }
            | NodeKind::PseudoElement { .. }
            | NodeKind::AttributeSelector { .. }
            | NodeKind::Literal { .. }
            | NodeKind::Numeric { .. }
            | NodeKind::HexColor { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::ArgumentSeparator
            | NodeKind::ConstantReference { .. } => None,
        }
    }

    fn children_vec(&self) -> Option<&Vec<NodeId>> {
        match self {
            NodeKind::Root { children }
            | NodeKind::ImportBlock { children }
            | NodeKind::ImportRule { children }
            | NodeKind::Body { children }
            | NodeKind::Ruleset { children }
            | NodeKind::MediaRule { children }
            | NodeKind::Keyframes { children, .. }
            | NodeKind::UnknownAtRule { children, .. }
            | NodeKind::SelectorList { children }
            | NodeKind::Selector { children, .. }
            | NodeKind::Combinator { children, .. }
            | NodeKind::DeclarationBlock { children }
            | NodeKind::Declaration { children, .. }
            | NodeKind::PropertyValue { children }
            | NodeKind::Function { children, .. }
            | NodeKind::FunctionArguments { children }
            | NodeKind::Definition { children, .. }
            | NodeKind::ConditionalBlock { children }
            | NodeKind::ConditionalRule { children, .. }
            | NodeKind::BooleanExpression { children, .. }
            | NodeKind::MixinDefinition { children, .. }
            | NodeKind::Mixin { children, .. }
            | NodeKind::Component { children, .. }
            | NodeKind::ForLoop { children, .. } => Some(children),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_lists() {
        assert!(NodeTag::Ruleset.accepts_child(NodeTag::SelectorList));
        assert!(NodeTag::Ruleset.accepts_child(NodeTag::DeclarationBlock));
        assert!(!NodeTag::Ruleset.accepts_child(NodeTag::Declaration));
        assert!(NodeTag::DeclarationBlock.accepts_child(NodeTag::Mixin));
        assert!(!NodeTag::DeclarationBlock.accepts_child(NodeTag::Ruleset));
        assert!(NodeTag::Body.accepts_child(NodeTag::ConditionalBlock));
    }

    #[test]
    fn test_parameter_positions_accept_all_value_kinds() {
        // Constant substitution can splice any value kind into `@media`
        // and `@for` parameters.
        for &value in VALUE_TAGS {
            assert!(NodeTag::MediaRule.accepts_child(value));
            assert!(NodeTag::ForLoop.accepts_child(value));
        }
        assert!(NodeTag::MediaRule.accepts_child(NodeTag::Body));
        assert!(NodeTag::ForLoop.accepts_child(NodeTag::Body));
    }

    #[test]
    fn test_leaves_accept_nothing() {
        assert_eq!(NodeTag::Literal.allowed_children(), None);
        assert!(!NodeTag::Literal.accepts_child(NodeTag::Literal));
        assert_eq!(NodeTag::ConstantReference.allowed_children(), None);
    }

    #[test]
    fn test_tag_round_trip() {
        let kind = NodeKind::ClassSelector { name: "foo".into() };
        assert_eq!(kind.tag(), NodeTag::ClassSelector);
        assert!(kind.children().is_empty());

        let kind = NodeKind::Body { children: vec![] };
        assert_eq!(kind.tag(), NodeTag::Body);
    }
}
