//! Abstract Syntax Tree (AST) representation
//!
//! Each node owns its children exclusively. Navigation chains are encoded
//! through the optional `target` of path steps and invocations: `a.b.where(c)`
//! is `Invocation { target: PathStep { target: PathStep a, name: b }, .. }`.
//! A missing target means the step applies to the current focus.

use crate::functions::FunctionKind;
use rust_decimal::Decimal;

/// AST node representing a FluentPath expression
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Literal value: 'text', 42, 4.5, true
    Literal(Literal),

    /// Member navigation: target.name (or name against the focus)
    PathStep {
        target: Option<Box<AstNode>>,
        name: String,
    },

    /// Function invocation: target.function(arguments)
    Invocation {
        target: Option<Box<AstNode>>,
        function: FunctionKind,
        arguments: Vec<AstNode>,
    },

    /// Binary expression: left operator right
    BinaryExpr {
        operator: BinaryOperator,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },

    /// Unary expression, written in postfix form: operand.not()
    UnaryExpr {
        operator: UnaryOperator,
        operand: Box<AstNode>,
    },

    /// External constant: %name
    ExternalConstantRef(String),

    /// Context reference: $context
    ContextRef,

    /// Union: a | b | c
    UnionExpr(Vec<AstNode>),
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    String(String),
    Integer(i64),
    Decimal(Decimal),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Or,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::In => "in",
        }
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

impl AstNode {
    /// Whether the node always yields a boolean or nothing.
    ///
    /// Used for top-level coercion: an empty predicate result means the
    /// invariant does not apply, an empty selection is just empty.
    pub fn is_predicate(&self) -> bool {
        match self {
            AstNode::BinaryExpr { .. } | AstNode::UnaryExpr { .. } => true,
            AstNode::Invocation { function, .. } => function.is_predicate(),
            AstNode::Literal(Literal::Boolean(_)) => true,
            _ => false,
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        let children: usize = match self {
            AstNode::Literal(_) | AstNode::ExternalConstantRef(_) | AstNode::ContextRef => 0,
            AstNode::PathStep { target, .. } => target.as_ref().map_or(0, |t| t.node_count()),
            AstNode::Invocation {
                target, arguments, ..
            } => {
                target.as_ref().map_or(0, |t| t.node_count())
                    + arguments.iter().map(AstNode::node_count).sum::<usize>()
            }
            AstNode::BinaryExpr { left, right, .. } => left.node_count() + right.node_count(),
            AstNode::UnaryExpr { operand, .. } => operand.node_count(),
            AstNode::UnionExpr(operands) => operands.iter().map(AstNode::node_count).sum(),
        };
        children + 1
    }
}
