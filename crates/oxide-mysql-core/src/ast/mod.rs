//! Abstract syntax tree for MySQL statements and expressions.
//!
//! Nodes are plain enums wrapped in [`ExprNode`] and [`Statement`], each
//! carrying a [`NodeBase`] with its span and lazily decoded source text.
//! Trees are walked with a [`Visitor`]; [`set_flag`] runs the flag pass
//! that marks which expressions hold references, aggregates, subqueries,
//! variables or placeholders.

mod expression;
pub mod flag;
mod node;
mod restore;
mod span;
mod statement;
mod visitor;

pub use expression::{ColumnName, ExprKind, ExprNode, Opcode, UnaryOp, WhenClause};
pub use flag::{has_agg_flag, is_constant, set_flag, FlagSetter};
pub use node::{Node, NodeBase, NodeText};
pub use restore::{unwrap_from_single_quotes, wrap_in_single_quotes};
pub use span::Span;
pub use statement::{
    Assignment, ByItem, ColumnDef, DeleteStmt, InsertStmt, JoinType, Limit, OrderDirection,
    SelectField, SelectStmt, Statement, StatementClass, StmtKind, TableName, TableRef,
    UpdateStmt, VariableAssignment,
};
pub use visitor::{Enter, Leave, Visitor};
