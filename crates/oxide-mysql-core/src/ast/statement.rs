//! Statement nodes.
//!
//! Every statement carries a [`StatementClass`] tag telling DDL from DML
//! statements, so callers can branch on the class without matching every
//! statement kind.

use super::expression::{ColumnName, ExprNode};
use super::node::{Node, NodeBase};
use super::visitor::{apply_leave, Enter, Visitor};
use crate::mysql::FieldType;

/// Whether a statement defines schema, manipulates data, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementClass {
    /// Data definition: CREATE, DROP.
    Ddl,
    /// Data manipulation: SELECT, INSERT, UPDATE, DELETE.
    Dml,
    /// Session and transaction control.
    Other,
}

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT JOIN.
    Left,
    /// RIGHT JOIN.
    Right,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TableName {
    /// Schema qualifier.
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
}

impl TableName {
    /// Creates an unqualified table name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Creates a schema-qualified table name.
    #[must_use]
    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

/// A table source in FROM or UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A named table.
    Table {
        name: TableName,
        alias: Option<String>,
    },
    /// A derived table.
    Subquery {
        stmt: Box<Statement>,
        alias: String,
    },
    /// A join of two sources.
    Join {
        left: Box<TableRef>,
        right: Box<TableRef>,
        join_type: JoinType,
        on: Option<ExprNode>,
    },
}

impl TableRef {
    /// Creates a table reference.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table {
            name: TableName::new(name),
            alias: None,
        }
    }

    /// Adds an alias to a named table. Other sources are returned unchanged.
    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        match self {
            Self::Table { name, .. } => Self::Table {
                name,
                alias: Some(alias.into()),
            },
            other => other,
        }
    }

    /// Joins `right` onto this source.
    #[must_use]
    pub fn join(self, join_type: JoinType, right: Self, on: Option<ExprNode>) -> Self {
        Self::Join {
            left: Box::new(self),
            right: Box::new(right),
            join_type,
            on,
        }
    }

    fn accept<V: Visitor + ?Sized>(&mut self, v: &mut V) -> bool {
        match self {
            Self::Table { .. } => true,
            Self::Subquery { stmt, .. } => stmt.accept(v),
            Self::Join {
                left, right, on, ..
            } => left.accept(v) && right.accept(v) && accept_opt(on.as_mut(), v),
        }
    }
}

/// An entry of the SELECT field list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    /// `*` or `t.*`.
    Wildcard { table: Option<String> },
    /// An expression with an optional alias.
    Expr {
        expr: ExprNode,
        alias: Option<String>,
    },
}

impl SelectField {
    /// Creates an unaliased expression field.
    #[must_use]
    pub const fn expr(expr: ExprNode) -> Self {
        Self::Expr { expr, alias: None }
    }
}

/// A GROUP BY or ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct ByItem {
    /// The grouping or ordering expression.
    pub expr: ExprNode,
    /// The direction.
    pub direction: OrderDirection,
}

impl ByItem {
    /// Creates an ascending item.
    #[must_use]
    pub const fn new(expr: ExprNode) -> Self {
        Self {
            expr,
            direction: OrderDirection::Asc,
        }
    }
}

/// `LIMIT count [OFFSET offset]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    /// Row count.
    pub count: ExprNode,
    /// Rows to skip.
    pub offset: Option<ExprNode>,
}

/// `column = expr` in UPDATE or ON DUPLICATE KEY UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Target column.
    pub column: ColumnName,
    /// New value.
    pub expr: ExprNode,
}

/// A column definition in CREATE TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column type.
    pub tp: FieldType,
    /// Whether NOT NULL was given.
    pub not_null: bool,
    /// The DEFAULT value.
    pub default: Option<ExprNode>,
}

/// A SET assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAssignment {
    /// Variable name.
    pub name: String,
    /// `@@global.` rather than session scope.
    pub is_global: bool,
    /// System variable rather than user variable.
    pub is_system: bool,
    /// Assigned value.
    pub value: ExprNode,
}

/// A SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectStmt {
    /// Whether DISTINCT was given.
    pub distinct: bool,
    /// The field list.
    pub fields: Vec<SelectField>,
    /// The FROM source.
    pub from: Option<TableRef>,
    /// WHERE condition.
    pub where_clause: Option<ExprNode>,
    /// GROUP BY items.
    pub group_by: Vec<ByItem>,
    /// HAVING condition.
    pub having: Option<ExprNode>,
    /// ORDER BY items.
    pub order_by: Vec<ByItem>,
    /// LIMIT clause.
    pub limit: Option<Limit>,
}

/// An INSERT or REPLACE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    /// REPLACE rather than INSERT.
    pub is_replace: bool,
    /// Target table.
    pub table: TableName,
    /// Column list.
    pub columns: Vec<ColumnName>,
    /// VALUES rows.
    pub values: Vec<Vec<ExprNode>>,
    /// `INSERT ... SELECT` source.
    pub select: Option<Box<Statement>>,
    /// ON DUPLICATE KEY UPDATE assignments.
    pub on_duplicate: Vec<Assignment>,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub table: TableRef,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<ExprNode>,
    pub order_by: Vec<ByItem>,
    pub limit: Option<Limit>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table: TableName,
    pub where_clause: Option<ExprNode>,
    pub order_by: Vec<ByItem>,
    pub limit: Option<Limit>,
}

/// A statement shape.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    CreateTable {
        if_not_exists: bool,
        table: TableName,
        columns: Vec<ColumnDef>,
    },
    DropTable {
        if_exists: bool,
        tables: Vec<TableName>,
    },
    CreateDatabase {
        if_not_exists: bool,
        name: String,
    },
    Set(Vec<VariableAssignment>),
    Use(String),
    Begin,
    Commit,
    Rollback,
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The statement shape.
    pub kind: StmtKind,
    /// Span and source text.
    pub base: NodeBase,
}

impl Statement {
    /// Wraps `kind` into a node.
    #[must_use]
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            base: NodeBase::default(),
        }
    }

    /// Creates a SELECT.
    #[must_use]
    pub fn select(select: SelectStmt) -> Self {
        Self::new(StmtKind::Select(select))
    }

    /// Creates `SELECT fields` with nothing else.
    #[must_use]
    pub fn select_exprs(fields: Vec<ExprNode>) -> Self {
        Self::select(SelectStmt {
            fields: fields.into_iter().map(SelectField::expr).collect(),
            ..SelectStmt::default()
        })
    }

    /// The statement class.
    #[must_use]
    pub const fn class(&self) -> StatementClass {
        match self.kind {
            StmtKind::Select(_)
            | StmtKind::Insert(_)
            | StmtKind::Update(_)
            | StmtKind::Delete(_) => StatementClass::Dml,
            StmtKind::CreateTable { .. }
            | StmtKind::DropTable { .. }
            | StmtKind::CreateDatabase { .. } => StatementClass::Ddl,
            StmtKind::Set(_)
            | StmtKind::Use(_)
            | StmtKind::Begin
            | StmtKind::Commit
            | StmtKind::Rollback => StatementClass::Other,
        }
    }

    /// Returns true for data definition statements.
    #[must_use]
    pub const fn is_ddl(&self) -> bool {
        matches!(self.class(), StatementClass::Ddl)
    }

    /// Returns true for data manipulation statements.
    #[must_use]
    pub const fn is_dml(&self) -> bool {
        matches!(self.class(), StatementClass::Dml)
    }

    /// Visits child nodes in clause order.
    fn accept_children<V: Visitor + ?Sized>(&mut self, v: &mut V) -> bool {
        match &mut self.kind {
            StmtKind::Select(sel) => {
                for field in &mut sel.fields {
                    if let SelectField::Expr { expr, .. } = field {
                        if !expr.accept(v) {
                            return false;
                        }
                    }
                }
                if let Some(from) = &mut sel.from {
                    if !from.accept(v) {
                        return false;
                    }
                }
                accept_opt(sel.where_clause.as_mut(), v)
                    && accept_items(&mut sel.group_by, v)
                    && accept_opt(sel.having.as_mut(), v)
                    && accept_items(&mut sel.order_by, v)
                    && accept_limit(sel.limit.as_mut(), v)
            }
            StmtKind::Insert(ins) => {
                for row in &mut ins.values {
                    if !row.iter_mut().all(|e| e.accept(v)) {
                        return false;
                    }
                }
                if let Some(select) = &mut ins.select {
                    if !select.accept(v) {
                        return false;
                    }
                }
                ins.on_duplicate.iter_mut().all(|a| a.expr.accept(v))
            }
            StmtKind::Update(upd) => {
                upd.table.accept(v)
                    && upd.assignments.iter_mut().all(|a| a.expr.accept(v))
                    && accept_opt(upd.where_clause.as_mut(), v)
                    && accept_items(&mut upd.order_by, v)
                    && accept_limit(upd.limit.as_mut(), v)
            }
            StmtKind::Delete(del) => {
                accept_opt(del.where_clause.as_mut(), v)
                    && accept_items(&mut del.order_by, v)
                    && accept_limit(del.limit.as_mut(), v)
            }
            StmtKind::CreateTable { columns, .. } => columns
                .iter_mut()
                .all(|c| accept_opt(c.default.as_mut(), v)),
            StmtKind::Set(vars) => vars.iter_mut().all(|a| a.value.accept(v)),
            StmtKind::DropTable { .. }
            | StmtKind::CreateDatabase { .. }
            | StmtKind::Use(_)
            | StmtKind::Begin
            | StmtKind::Commit
            | StmtKind::Rollback => true,
        }
    }
}

fn accept_opt<V: Visitor + ?Sized>(expr: Option<&mut ExprNode>, v: &mut V) -> bool {
    match expr {
        Some(expr) => expr.accept(v),
        None => true,
    }
}

fn accept_items<V: Visitor + ?Sized>(items: &mut [ByItem], v: &mut V) -> bool {
    items.iter_mut().all(|item| item.expr.accept(v))
}

fn accept_limit<V: Visitor + ?Sized>(limit: Option<&mut Limit>, v: &mut V) -> bool {
    match limit {
        Some(limit) => limit.count.accept(v) && accept_opt(limit.offset.as_mut(), v),
        None => true,
    }
}

impl Node for Statement {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn accept<V: Visitor + ?Sized>(&mut self, v: &mut V) -> bool {
        match v.enter_stmt(self) {
            Enter::Continue => {}
            Enter::Replace(node) => *self = node,
            Enter::SkipChildren => {
                let leave = v.leave_stmt(self);
                return apply_leave(self, leave);
            }
        }
        if !self.accept_children(v) {
            return false;
        }
        let leave = v.leave_stmt(self);
        apply_leave(self, leave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_class() {
        assert!(Statement::select_exprs(vec![ExprNode::value(1i64)]).is_dml());
        let create = Statement::new(StmtKind::CreateDatabase {
            if_not_exists: true,
            name: "d".into(),
        });
        assert!(create.is_ddl());
        assert!(!create.is_dml());
        assert_eq!(Statement::new(StmtKind::Begin).class(), StatementClass::Other);
    }

    #[test]
    fn test_table_ref_alias() {
        let t = TableRef::table("users").alias("u");
        assert_eq!(
            t,
            TableRef::Table {
                name: TableName::new("users"),
                alias: Some("u".into()),
            }
        );
    }

    #[test]
    fn test_order_direction() {
        assert_eq!(OrderDirection::default(), OrderDirection::Asc);
        assert_eq!(OrderDirection::Desc.as_str(), "DESC");
        assert_eq!(JoinType::Left.as_str(), "LEFT JOIN");
    }
}
