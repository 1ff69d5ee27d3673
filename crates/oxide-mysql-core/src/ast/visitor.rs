//! The enter/leave traversal protocol.
//!
//! [`Node::accept`](super::Node::accept) calls the visitor's `enter_*` hook
//! on the way down and its `leave_*` hook on the way up. Children are
//! walked in clause order: for a SELECT that is the field list, FROM,
//! WHERE, GROUP BY, HAVING, ORDER BY, then LIMIT.
//!
//! - `Enter::Replace` swaps the node and walks the replacement's children.
//! - `Enter::SkipChildren` goes straight to `leave_*`.
//! - `Leave::Stop` aborts the walk. Ancestors do not get their `leave_*`
//!   call and `accept` returns false.

use super::expression::ExprNode;
use super::statement::Statement;

/// Result of an `enter_*` hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Enter<T> {
    /// Walk the children.
    Continue,
    /// Do not walk the children.
    SkipChildren,
    /// Replace the node, then walk the replacement's children.
    Replace(T),
}

/// Result of a `leave_*` hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Leave<T> {
    /// Keep walking.
    Continue,
    /// Replace the node and keep walking.
    Replace(T),
    /// Abort the walk.
    Stop,
}

/// A tree visitor. Every hook defaults to a no-op, so a visitor only
/// overrides the hooks it needs.
pub trait Visitor {
    fn enter_expr(&mut self, _expr: &mut ExprNode) -> Enter<ExprNode> {
        Enter::Continue
    }

    fn leave_expr(&mut self, _expr: &mut ExprNode) -> Leave<ExprNode> {
        Leave::Continue
    }

    fn enter_stmt(&mut self, _stmt: &mut Statement) -> Enter<Statement> {
        Enter::Continue
    }

    fn leave_stmt(&mut self, _stmt: &mut Statement) -> Leave<Statement> {
        Leave::Continue
    }
}

/// Applies a `leave_*` result to `node`. Returns false on [`Leave::Stop`].
pub(crate) fn apply_leave<T>(node: &mut T, leave: Leave<T>) -> bool {
    match leave {
        Leave::Continue => true,
        Leave::Replace(new) => {
            *node = new;
            true
        }
        Leave::Stop => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, Node};

    #[derive(Default)]
    struct Recorder {
        entered: Vec<String>,
        left: Vec<String>,
    }

    fn label(expr: &ExprNode) -> String {
        match &expr.kind {
            ExprKind::Value(v) => v.to_string(),
            ExprKind::Column(c) => c.name.clone(),
            ExprKind::BinaryOp { op, .. } => op.as_str().to_string(),
            other => format!("{other:?}"),
        }
    }

    impl Visitor for Recorder {
        fn enter_expr(&mut self, expr: &mut ExprNode) -> Enter<ExprNode> {
            self.entered.push(label(expr));
            Enter::Continue
        }

        fn leave_expr(&mut self, expr: &mut ExprNode) -> Leave<ExprNode> {
            self.left.push(label(expr));
            Leave::Continue
        }
    }

    #[test]
    fn test_noop_visitor_keeps_tree() {
        struct Noop;
        impl Visitor for Noop {}

        let mut expr = ExprNode::column("a").plus(ExprNode::value(1i64));
        let before = expr.clone();
        assert!(expr.accept(&mut Noop));
        assert_eq!(expr, before);
    }

    #[test]
    fn test_enter_and_leave_order() {
        let mut expr = ExprNode::column("a").plus(ExprNode::value(1i64));
        let mut rec = Recorder::default();
        assert!(expr.accept(&mut rec));
        assert_eq!(rec.entered, ["+", "a", "1"]);
        assert_eq!(rec.left, ["a", "1", "+"]);
    }

    #[test]
    fn test_leave_replace() {
        struct ColumnsToZero;
        impl Visitor for ColumnsToZero {
            fn leave_expr(&mut self, expr: &mut ExprNode) -> Leave<ExprNode> {
                if matches!(expr.kind, ExprKind::Column(_)) {
                    return Leave::Replace(ExprNode::value(0i64));
                }
                Leave::Continue
            }
        }

        let mut expr = ExprNode::column("a").eq(ExprNode::column("b"));
        assert!(expr.accept(&mut ColumnsToZero));
        assert_eq!(expr, ExprNode::value(0i64).eq(ExprNode::value(0i64)));
    }

    #[test]
    fn test_apply_leave() {
        let mut n = 1;
        assert!(apply_leave(&mut n, Leave::Continue));
        assert!(apply_leave(&mut n, Leave::Replace(2)));
        assert_eq!(n, 2);
        assert!(!apply_leave(&mut n, Leave::Stop));
        assert_eq!(n, 2);
    }
}
