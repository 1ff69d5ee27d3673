//! Semantic flags of expression nodes.
//!
//! A node's flags are its own marker ORed with the flags of everything
//! below it, so a node is constant exactly when no marker appears anywhere
//! in its subtree. Subqueries are opaque: a subquery node carries
//! [`HAS_SUBQUERY`] and nothing from the statement inside it.

use super::expression::{ExprKind, ExprNode};
use super::node::Node;
use super::visitor::{Leave, Visitor};

/// No markers: the expression is constant.
pub const CONSTANT: u64 = 0;
/// A `?` placeholder appears.
pub const HAS_PARAM_MARKER: u64 = 1 << 1;
/// A scalar function call or CAST appears.
pub const HAS_FUNC: u64 = 1 << 2;
/// A column, `VALUES()` or position reference appears.
pub const HAS_REFERENCE: u64 = 1 << 3;
/// An aggregate function appears.
pub const HAS_AGGREGATE_FUNC: u64 = 1 << 4;
/// A subquery appears.
pub const HAS_SUBQUERY: u64 = 1 << 5;
/// A user or system variable appears.
pub const HAS_VARIABLE: u64 = 1 << 6;
/// `DEFAULT` appears.
pub const HAS_DEFAULT: u64 = 1 << 7;
/// The expression was already evaluated by a rewrite.
pub const PRE_EVALUATED: u64 = 1 << 8;

/// Computes flags bottom-up on every expression node it visits.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlagSetter;

impl Visitor for FlagSetter {
    fn leave_expr(&mut self, expr: &mut ExprNode) -> Leave<ExprNode> {
        let flag = compute_flag(expr);
        expr.set_flag(flag);
        Leave::Continue
    }
}

fn or_all<'a>(exprs: impl IntoIterator<Item = &'a ExprNode>) -> u64 {
    exprs.into_iter().fold(CONSTANT, |acc, e| acc | e.flag())
}

fn opt_flag(expr: Option<&ExprNode>) -> u64 {
    expr.map_or(CONSTANT, ExprNode::flag)
}

/// The flags of `expr`, assuming its children are already flagged.
fn compute_flag(expr: &ExprNode) -> u64 {
    match &expr.kind {
        ExprKind::Value(_) => CONSTANT,
        ExprKind::ParamMarker { .. } => HAS_PARAM_MARKER,
        ExprKind::Column(_) | ExprKind::Values(_) | ExprKind::Position { .. } => HAS_REFERENCE,
        ExprKind::Default { .. } => HAS_DEFAULT,
        ExprKind::Subquery(_) | ExprKind::Exists { .. } => HAS_SUBQUERY,
        ExprKind::Variable { value, .. } => HAS_VARIABLE | opt_flag(value.as_deref()),
        ExprKind::FuncCall { args, .. } => HAS_FUNC | or_all(args),
        ExprKind::Cast { expr, .. } => HAS_FUNC | expr.flag(),
        ExprKind::Aggregate { args, .. } => HAS_AGGREGATE_FUNC | or_all(args),
        ExprKind::Between {
            expr, left, right, ..
        } => expr.flag() | left.flag() | right.flag(),
        ExprKind::BinaryOp { left, right, .. }
        | ExprKind::CompareSubquery { left, right, .. } => left.flag() | right.flag(),
        ExprKind::UnaryOp { expr, .. }
        | ExprKind::IsNull { expr, .. }
        | ExprKind::IsTruth { expr, .. }
        | ExprKind::Paren(expr) => expr.flag(),
        ExprKind::PatternLike { expr, pattern, .. }
        | ExprKind::PatternRegexp { expr, pattern, .. } => expr.flag() | pattern.flag(),
        ExprKind::PatternIn {
            expr, list, sel, ..
        } => expr.flag() | or_all(list) | opt_flag(sel.as_deref()),
        ExprKind::Case {
            value,
            when_clauses,
            else_clause,
        } => {
            let arms = when_clauses
                .iter()
                .fold(CONSTANT, |acc, w| acc | w.expr.flag() | w.result.flag());
            opt_flag(value.as_deref()) | arms | opt_flag(else_clause.as_deref())
        }
        ExprKind::Row(values) => or_all(values),
    }
}

/// Sets the flags of every expression in `node`'s tree.
pub fn set_flag<N: Node>(node: &mut N) {
    node.accept(&mut FlagSetter);
}

/// Returns true if an aggregate function appears in `expr`'s subtree.
#[must_use]
pub const fn has_agg_flag(expr: &ExprNode) -> bool {
    expr.flag() & HAS_AGGREGATE_FUNC != 0
}

/// Returns true if no marker appears in `expr`'s subtree.
#[must_use]
pub const fn is_constant(expr: &ExprNode) -> bool {
    expr.flag() == CONSTANT
}
