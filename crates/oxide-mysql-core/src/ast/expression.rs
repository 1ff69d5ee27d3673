//! Expression nodes.

use super::node::{Node, NodeBase};
use super::statement::Statement;
use super::visitor::{apply_leave, Enter, Visitor};
use crate::mysql::FieldType;
use crate::types::Value;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Logical
    LogicAnd,
    LogicOr,
    LogicXor,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    NullEq,

    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    IntDiv,
    Mod,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl Opcode {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LogicAnd => "AND",
            Self::LogicOr => "OR",
            Self::LogicXor => "XOR",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::NullEq => "<=>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IntDiv => "DIV",
            Self::Mod => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns true for operators spelled as keywords.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::LogicAnd | Self::LogicOr | Self::LogicXor | Self::IntDiv
        )
    }

    /// Returns true for comparison operators.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::NullEq
        )
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::LogicOr => 1,
            Self::LogicXor => 2,
            Self::LogicAnd => 3,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::NullEq => 5,
            Self::BitOr => 6,
            Self::BitAnd => 7,
            Self::LeftShift | Self::RightShift => 8,
            Self::Plus | Self::Minus => 9,
            Self::Mul | Self::Div | Self::IntDiv | Self::Mod => 10,
            Self::BitXor => 11,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Negation (-)
    Minus,
    /// Unary plus (+)
    Plus,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNeg,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Not => "NOT",
            Self::BitNeg => "~",
        }
    }
}

/// A possibly qualified column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ColumnName {
    /// Schema qualifier.
    pub schema: Option<String>,
    /// Table qualifier.
    pub table: Option<String>,
    /// Column name.
    pub name: String,
}

impl ColumnName {
    /// Creates an unqualified column name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: None,
            name: name.into(),
        }
    }

    /// Adds a table qualifier.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Adds a schema qualifier.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// A `WHEN ... THEN ...` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenClause {
    /// The condition or the value compared with the CASE operand.
    pub expr: ExprNode,
    /// The result when the arm matches.
    pub result: ExprNode,
}

/// The shape of an expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A resolved literal.
    Value(Value),

    /// A `?` placeholder.
    ParamMarker {
        /// 0-based position among the statement's placeholders.
        order: usize,
    },

    /// A column reference.
    Column(ColumnName),

    /// `expr [NOT] BETWEEN left AND right`.
    Between {
        expr: Box<ExprNode>,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
        not: bool,
    },

    /// A binary operation.
    BinaryOp {
        op: Opcode,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },

    /// A unary operation.
    UnaryOp { op: UnaryOp, expr: Box<ExprNode> },

    /// `CASE [value] WHEN ... THEN ... [ELSE ...] END`.
    Case {
        value: Option<Box<ExprNode>>,
        when_clauses: Vec<WhenClause>,
        else_clause: Option<Box<ExprNode>>,
    },

    /// `left op {ANY|ALL} (subquery)`.
    CompareSubquery {
        left: Box<ExprNode>,
        op: Opcode,
        right: Box<ExprNode>,
        all: bool,
    },

    /// `DEFAULT` or `DEFAULT(column)`.
    Default { name: Option<ColumnName> },

    /// `[NOT] EXISTS (subquery)`.
    Exists { sel: Box<ExprNode>, not: bool },

    /// `expr IS [NOT] NULL`.
    IsNull { expr: Box<ExprNode>, not: bool },

    /// `expr IS [NOT] {TRUE|FALSE}`.
    IsTruth {
        expr: Box<ExprNode>,
        not: bool,
        truth: bool,
    },

    /// A parenthesized expression.
    Paren(Box<ExprNode>),

    /// `expr [NOT] IN (list)` or `expr [NOT] IN (subquery)`.
    PatternIn {
        expr: Box<ExprNode>,
        list: Vec<ExprNode>,
        not: bool,
        sel: Option<Box<ExprNode>>,
    },

    /// `expr [NOT] LIKE pattern [ESCAPE c]`.
    PatternLike {
        expr: Box<ExprNode>,
        pattern: Box<ExprNode>,
        not: bool,
        escape: char,
    },

    /// `expr [NOT] REGEXP pattern`.
    PatternRegexp {
        expr: Box<ExprNode>,
        pattern: Box<ExprNode>,
        not: bool,
    },

    /// A 1-based select field position, as in `ORDER BY 1`.
    Position { n: usize },

    /// `ROW(a, b, ...)`.
    Row(Vec<ExprNode>),

    /// A scalar subquery.
    Subquery(Box<Statement>),

    /// `VALUES(column)` in `ON DUPLICATE KEY UPDATE`.
    Values(ColumnName),

    /// A user (`@a`) or system (`@@a`) variable, with an optional
    /// assigned value (`@a := expr`).
    Variable {
        name: String,
        is_global: bool,
        is_system: bool,
        value: Option<Box<ExprNode>>,
    },

    /// A scalar function call.
    FuncCall { name: String, args: Vec<ExprNode> },

    /// `CAST(expr AS type)`.
    Cast { expr: Box<ExprNode>, tp: FieldType },

    /// An aggregate function call. Empty `args` is `COUNT(*)`.
    Aggregate {
        name: String,
        distinct: bool,
        args: Vec<ExprNode>,
    },
}

/// An expression node: its shape, source text, type and semantic flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    /// The expression shape.
    pub kind: ExprKind,
    /// Span and source text.
    pub base: NodeBase,
    /// Result type.
    pub tp: FieldType,
    flag: u64,
}

impl ExprNode {
    /// Wraps `kind` into a node. Values get their literal type.
    #[must_use]
    pub fn new(kind: ExprKind) -> Self {
        let tp = match &kind {
            ExprKind::Value(v) => v.field_type(),
            ExprKind::Cast { tp, .. } => tp.clone(),
            _ => FieldType::default(),
        };
        Self {
            kind,
            base: NodeBase::default(),
            tp,
            flag: 0,
        }
    }

    /// The semantic flags set by the flag pass.
    #[must_use]
    pub const fn flag(&self) -> u64 {
        self.flag
    }

    /// Replaces the semantic flags.
    pub fn set_flag(&mut self, flag: u64) {
        self.flag = flag;
    }

    /// Adds to the semantic flags.
    pub fn or_flag(&mut self, flag: u64) {
        self.flag |= flag;
    }

    /// Creates a literal.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::new(ExprKind::Value(value.into()))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub fn null() -> Self {
        Self::value(Value::Null)
    }

    /// Creates a `?` placeholder.
    #[must_use]
    pub fn param(order: usize) -> Self {
        Self::new(ExprKind::ParamMarker { order })
    }

    /// Creates a column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Column(ColumnName::new(name)))
    }

    /// Creates a table-qualified column reference.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ExprKind::Column(ColumnName::new(name).table(table)))
    }

    /// Creates a binary operation.
    #[must_use]
    pub fn binary(self, op: Opcode, right: Self) -> Self {
        Self::new(ExprKind::BinaryOp {
            op,
            left: Box::new(self),
            right: Box::new(right),
        })
    }

    /// Creates `self = right`.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(Opcode::Eq, right)
    }

    /// Creates `self > right`.
    #[must_use]
    pub fn gt(self, right: Self) -> Self {
        self.binary(Opcode::Gt, right)
    }

    /// Creates `self + right`.
    #[must_use]
    pub fn plus(self, right: Self) -> Self {
        self.binary(Opcode::Plus, right)
    }

    /// Creates `self AND right`.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(Opcode::LogicAnd, right)
    }

    /// Creates `self OR right`.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.binary(Opcode::LogicOr, right)
    }

    /// Creates a unary operation.
    #[must_use]
    pub fn unary(op: UnaryOp, expr: Self) -> Self {
        Self::new(ExprKind::UnaryOp {
            op,
            expr: Box::new(expr),
        })
    }

    /// Creates `-self`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn neg(self) -> Self {
        Self::unary(UnaryOp::Minus, self)
    }

    /// Creates `self BETWEEN left AND right`.
    #[must_use]
    pub fn between(self, left: Self, right: Self) -> Self {
        Self::new(ExprKind::Between {
            expr: Box::new(self),
            left: Box::new(left),
            right: Box::new(right),
            not: false,
        })
    }

    /// Creates `self NOT BETWEEN left AND right`.
    #[must_use]
    pub fn not_between(self, left: Self, right: Self) -> Self {
        Self::new(ExprKind::Between {
            expr: Box::new(self),
            left: Box::new(left),
            right: Box::new(right),
            not: true,
        })
    }

    /// Creates `self IS NULL`.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::new(ExprKind::IsNull {
            expr: Box::new(self),
            not: false,
        })
    }

    /// Creates `self IS NOT NULL`.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::new(ExprKind::IsNull {
            expr: Box::new(self),
            not: true,
        })
    }

    /// Creates `self IS TRUE` or `self IS FALSE`.
    #[must_use]
    pub fn is_truth(self, truth: bool) -> Self {
        Self::new(ExprKind::IsTruth {
            expr: Box::new(self),
            not: false,
            truth,
        })
    }

    /// Creates `self IN (list)`.
    #[must_use]
    pub fn in_list(self, list: Vec<Self>) -> Self {
        Self::new(ExprKind::PatternIn {
            expr: Box::new(self),
            list,
            not: false,
            sel: None,
        })
    }

    /// Creates `self NOT IN (list)`.
    #[must_use]
    pub fn not_in_list(self, list: Vec<Self>) -> Self {
        Self::new(ExprKind::PatternIn {
            expr: Box::new(self),
            list,
            not: true,
            sel: None,
        })
    }

    /// Creates `self IN (subquery)`.
    #[must_use]
    pub fn in_subquery(self, sel: Self) -> Self {
        Self::new(ExprKind::PatternIn {
            expr: Box::new(self),
            list: Vec::new(),
            not: false,
            sel: Some(Box::new(sel)),
        })
    }

    /// Creates `self LIKE pattern` with the default `\` escape.
    #[must_use]
    pub fn like(self, pattern: Self) -> Self {
        Self::new(ExprKind::PatternLike {
            expr: Box::new(self),
            pattern: Box::new(pattern),
            not: false,
            escape: '\\',
        })
    }

    /// Creates `self REGEXP pattern`.
    #[must_use]
    pub fn regexp(self, pattern: Self) -> Self {
        Self::new(ExprKind::PatternRegexp {
            expr: Box::new(self),
            pattern: Box::new(pattern),
            not: false,
        })
    }

    /// Wraps the node in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self::new(ExprKind::Paren(Box::new(self)))
    }

    /// Creates `CASE [value] WHEN ... THEN ... [ELSE ...] END`.
    #[must_use]
    pub fn case(value: Option<Self>, arms: Vec<(Self, Self)>, else_clause: Option<Self>) -> Self {
        Self::new(ExprKind::Case {
            value: value.map(Box::new),
            when_clauses: arms
                .into_iter()
                .map(|(expr, result)| WhenClause { expr, result })
                .collect(),
            else_clause: else_clause.map(Box::new),
        })
    }

    /// Creates a scalar subquery.
    #[must_use]
    pub fn subquery(stmt: Statement) -> Self {
        Self::new(ExprKind::Subquery(Box::new(stmt)))
    }

    /// Creates `EXISTS (subquery)`.
    #[must_use]
    pub fn exists(sel: Self) -> Self {
        Self::new(ExprKind::Exists {
            sel: Box::new(sel),
            not: false,
        })
    }

    /// Creates `self op ANY (subquery)`, or `ALL` when `all` is set.
    #[must_use]
    pub fn compare_subquery(self, op: Opcode, sel: Self, all: bool) -> Self {
        Self::new(ExprKind::CompareSubquery {
            left: Box::new(self),
            op,
            right: Box::new(sel),
            all,
        })
    }

    /// Creates `ROW(values)`.
    #[must_use]
    pub fn row(values: Vec<Self>) -> Self {
        Self::new(ExprKind::Row(values))
    }

    /// Creates a user variable reference.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Variable {
            name: name.into(),
            is_global: false,
            is_system: false,
            value: None,
        })
    }

    /// Creates a system variable reference.
    #[must_use]
    pub fn system_variable(name: impl Into<String>, is_global: bool) -> Self {
        Self::new(ExprKind::Variable {
            name: name.into(),
            is_global,
            is_system: true,
            value: None,
        })
    }

    /// Creates `DEFAULT(column)`, or bare `DEFAULT` without a column.
    #[must_use]
    pub fn default_value(name: Option<ColumnName>) -> Self {
        Self::new(ExprKind::Default { name })
    }

    /// Creates `VALUES(column)`.
    #[must_use]
    pub fn values(name: ColumnName) -> Self {
        Self::new(ExprKind::Values(name))
    }

    /// Creates a select field position.
    #[must_use]
    pub fn position(n: usize) -> Self {
        Self::new(ExprKind::Position { n })
    }

    /// Creates a scalar function call.
    #[must_use]
    pub fn func(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::new(ExprKind::FuncCall {
            name: name.into(),
            args,
        })
    }

    /// Creates `CAST(self AS tp)`.
    #[must_use]
    pub fn cast(self, tp: FieldType) -> Self {
        Self::new(ExprKind::Cast {
            expr: Box::new(self),
            tp,
        })
    }

    /// Creates an aggregate function call.
    #[must_use]
    pub fn aggregate(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::new(ExprKind::Aggregate {
            name: name.into(),
            distinct: false,
            args,
        })
    }

    /// Creates `COUNT(*)`.
    #[must_use]
    pub fn count_star() -> Self {
        Self::aggregate("count", Vec::new())
    }

    /// Returns true if this node is a literal.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self.kind, ExprKind::Value(_))
    }

    /// Visits the children in source order. Returns false once a child
    /// stops the walk.
    fn accept_children<V: Visitor + ?Sized>(&mut self, v: &mut V) -> bool {
        match &mut self.kind {
            ExprKind::Value(_)
            | ExprKind::ParamMarker { .. }
            | ExprKind::Column(_)
            | ExprKind::Default { .. }
            | ExprKind::Position { .. }
            | ExprKind::Values(_) => true,
            ExprKind::Between {
                expr, left, right, ..
            } => expr.accept(v) && left.accept(v) && right.accept(v),
            ExprKind::BinaryOp { left, right, .. }
            | ExprKind::CompareSubquery { left, right, .. } => left.accept(v) && right.accept(v),
            ExprKind::UnaryOp { expr, .. }
            | ExprKind::IsNull { expr, .. }
            | ExprKind::IsTruth { expr, .. }
            | ExprKind::Cast { expr, .. }
            | ExprKind::Exists { sel: expr, .. }
            | ExprKind::Paren(expr) => expr.accept(v),
            ExprKind::Case {
                value,
                when_clauses,
                else_clause,
            } => {
                if !accept_opt(value.as_mut(), v) {
                    return false;
                }
                for arm in when_clauses {
                    if !arm.expr.accept(v) || !arm.result.accept(v) {
                        return false;
                    }
                }
                accept_opt(else_clause.as_mut(), v)
            }
            ExprKind::PatternIn {
                expr, list, sel, ..
            } => {
                if !expr.accept(v) {
                    return false;
                }
                if !list.iter_mut().all(|e| e.accept(v)) {
                    return false;
                }
                accept_opt(sel.as_mut(), v)
            }
            ExprKind::PatternLike { expr, pattern, .. }
            | ExprKind::PatternRegexp { expr, pattern, .. } => {
                expr.accept(v) && pattern.accept(v)
            }
            ExprKind::Row(values)
            | ExprKind::FuncCall { args: values, .. }
            | ExprKind::Aggregate { args: values, .. } => values.iter_mut().all(|e| e.accept(v)),
            ExprKind::Subquery(stmt) => stmt.accept(v),
            ExprKind::Variable { value, .. } => accept_opt(value.as_mut(), v),
        }
    }
}

impl Node for ExprNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn accept<V: Visitor + ?Sized>(&mut self, v: &mut V) -> bool {
        match v.enter_expr(self) {
            Enter::Continue => {}
            Enter::Replace(node) => *self = node,
            Enter::SkipChildren => {
                let leave = v.leave_expr(self);
                return apply_leave(self, leave);
            }
        }
        if !self.accept_children(v) {
            return false;
        }
        let leave = v.leave_expr(self);
        apply_leave(self, leave)
    }
}

fn accept_opt<V: Visitor + ?Sized>(node: Option<&mut Box<ExprNode>>, v: &mut V) -> bool {
    match node {
        Some(node) => node.accept(v),
        None => true,
    }
}
