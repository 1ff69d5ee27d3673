//! Rendering nodes back to SQL text.
//!
//! Identifiers are backtick-quoted, keywords are upper case, and strings
//! are single-quoted. Symbolic operators are written without surrounding
//! spaces (`` `a`+1 ``), keyword operators with them (`` `a` DIV 2 ``).
//! No parentheses are added beyond the [`ExprKind::Paren`] nodes in the
//! tree.

use std::fmt::{self, Display, Formatter, Write};

use super::expression::{ColumnName, ExprKind, ExprNode, UnaryOp};
use super::statement::{
    ByItem, Limit, OrderDirection, SelectField, SelectStmt, Statement, StmtKind, TableName,
    TableRef,
};
use crate::mysql::{FieldType, MysqlType};
use crate::types::Value;

/// Wraps `s` in single quotes, doubling `'` and escaping `\`.
#[must_use]
pub fn wrap_in_single_quotes(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

/// Undoes [`wrap_in_single_quotes`]. Input that is not quoted is returned
/// unchanged.
#[must_use]
pub fn unwrap_from_single_quotes(s: &str) -> String {
    if s.len() < 2 || !s.starts_with('\'') || !s.ends_with('\'') {
        return s.to_string();
    }
    s[1..s.len() - 1].replace("\\\\", "\\").replace("''", "'")
}

struct Ident<'a>(&'a str);

impl Display for Ident<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.0.replace('`', "``"))
    }
}

impl Display for ColumnName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", Ident(schema))?;
        }
        if let Some(table) = &self.table {
            write!(f, "{}.", Ident(table))?;
        }
        write!(f, "{}", Ident(&self.name))
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", Ident(schema))?;
        }
        write!(f, "{}", Ident(&self.name))
    }
}

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_value(f: &mut Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("NULL"),
        Value::Int(_) | Value::Uint(_) | Value::Float(_) | Value::Decimal(_) => {
            write!(f, "{value}")
        }
        Value::Bytes(bytes) => {
            f.write_str("X'")?;
            for b in bytes {
                write!(f, "{b:02X}")?;
            }
            f.write_char('\'')
        }
        Value::String(_)
        | Value::Time(_)
        | Value::Duration(_)
        | Value::Enum(_)
        | Value::Set(_) => f.write_str(&wrap_in_single_quotes(&value.to_string())),
    }
}

fn cast_type(tp: &FieldType) -> String {
    if tp.tp.is_integer() {
        return if tp.is_unsigned() { "UNSIGNED" } else { "SIGNED" }.to_string();
    }
    if tp.tp.is_string() && !matches!(tp.tp, MysqlType::Enum | MysqlType::Set) {
        let name = if tp.is_binary_str() { "BINARY" } else { "CHAR" };
        return match tp.flen {
            Some(flen) => format!("{name}({flen})"),
            None => name.to_string(),
        };
    }
    tp.to_sql().to_uppercase()
}

fn not(flag: bool) -> &'static str {
    if flag {
        "NOT "
    } else {
        ""
    }
}

impl Display for ExprNode {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Value(value) => write_value(f, value),
            ExprKind::ParamMarker { .. } => f.write_char('?'),
            ExprKind::Column(name) => write!(f, "{name}"),
            ExprKind::Between {
                expr,
                left,
                right,
                not: negated,
            } => write!(f, "{expr} {}BETWEEN {left} AND {right}", not(*negated)),
            ExprKind::BinaryOp { op, left, right } => {
                if op.is_keyword() {
                    write!(f, "{left} {} {right}", op.as_str())
                } else {
                    write!(f, "{left}{}{right}", op.as_str())
                }
            }
            ExprKind::UnaryOp { op, expr } => match op {
                UnaryOp::Not => write!(f, "NOT {expr}"),
                _ => write!(f, "{}{expr}", op.as_str()),
            },
            ExprKind::Case {
                value,
                when_clauses,
                else_clause,
            } => {
                f.write_str("CASE")?;
                if let Some(value) = value {
                    write!(f, " {value}")?;
                }
                for arm in when_clauses {
                    write!(f, " WHEN {} THEN {}", arm.expr, arm.result)?;
                }
                if let Some(else_clause) = else_clause {
                    write!(f, " ELSE {else_clause}")?;
                }
                f.write_str(" END")
            }
            ExprKind::CompareSubquery {
                left,
                op,
                right,
                all,
            } => {
                let quantifier = if *all { "ALL" } else { "ANY" };
                write!(f, "{left}{}{quantifier} {right}", op.as_str())
            }
            ExprKind::Default { name } => match name {
                Some(name) => write!(f, "DEFAULT({name})"),
                None => f.write_str("DEFAULT"),
            },
            ExprKind::Exists { sel, not: negated } => {
                write!(f, "{}EXISTS {sel}", not(*negated))
            }
            ExprKind::IsNull { expr, not: negated } => {
                write!(f, "{expr} IS {}NULL", not(*negated))
            }
            ExprKind::IsTruth {
                expr,
                not: negated,
                truth,
            } => {
                let truth = if *truth { "TRUE" } else { "FALSE" };
                write!(f, "{expr} IS {}{truth}", not(*negated))
            }
            ExprKind::Paren(expr) => write!(f, "({expr})"),
            ExprKind::PatternIn {
                expr,
                list,
                not: negated,
                sel,
            } => {
                write!(f, "{expr} {}IN ", not(*negated))?;
                match sel {
                    Some(sel) => write!(f, "{sel}"),
                    None => {
                        f.write_char('(')?;
                        write_list(f, list, ",")?;
                        f.write_char(')')
                    }
                }
            }
            ExprKind::PatternLike {
                expr,
                pattern,
                not: negated,
                escape,
            } => {
                write!(f, "{expr} {}LIKE {pattern}", not(*negated))?;
                if *escape != '\\' {
                    write!(f, " ESCAPE {}", wrap_in_single_quotes(&escape.to_string()))?;
                }
                Ok(())
            }
            ExprKind::PatternRegexp {
                expr,
                pattern,
                not: negated,
            } => write!(f, "{expr} {}REGEXP {pattern}", not(*negated)),
            ExprKind::Position { n } => write!(f, "{n}"),
            ExprKind::Row(values) => {
                f.write_str("ROW(")?;
                write_list(f, values, ",")?;
                f.write_char(')')
            }
            ExprKind::Subquery(stmt) => write!(f, "({stmt})"),
            ExprKind::Values(name) => write!(f, "VALUES({name})"),
            ExprKind::Variable {
                name,
                is_global,
                is_system,
                value,
            } => {
                if *is_system {
                    f.write_str("@@")?;
                    if *is_global {
                        f.write_str("GLOBAL.")?;
                    }
                } else {
                    f.write_char('@')?;
                }
                write!(f, "{}", Ident(name))?;
                if let Some(value) = value {
                    write!(f, ":={value}")?;
                }
                Ok(())
            }
            ExprKind::FuncCall { name, args } => {
                write!(f, "{}(", name.to_uppercase())?;
                write_list(f, args, ", ")?;
                f.write_char(')')
            }
            ExprKind::Cast { expr, tp } => write!(f, "CAST({expr} AS {})", cast_type(tp)),
            ExprKind::Aggregate {
                name,
                distinct,
                args,
            } => {
                write!(f, "{}(", name.to_uppercase())?;
                if *distinct {
                    f.write_str("DISTINCT ")?;
                }
                if args.is_empty() {
                    f.write_char('*')?;
                } else {
                    write_list(f, args, ", ")?;
                }
                f.write_char(')')
            }
        }
    }
}

impl Display for SelectField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard { table: Some(table) } => write!(f, "{}.*", Ident(table)),
            Self::Wildcard { table: None } => f.write_char('*'),
            Self::Expr { expr, alias } => {
                write!(f, "{expr}")?;
                if let Some(alias) = alias {
                    write!(f, " AS {}", Ident(alias))?;
                }
                Ok(())
            }
        }
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table { name, alias } => {
                write!(f, "{name}")?;
                if let Some(alias) = alias {
                    write!(f, " AS {}", Ident(alias))?;
                }
                Ok(())
            }
            Self::Subquery { stmt, alias } => write!(f, "({stmt}) AS {}", Ident(alias)),
            Self::Join {
                left,
                right,
                join_type,
                on,
            } => {
                write!(f, "{left} {} {right}", join_type.as_str())?;
                if let Some(on) = on {
                    write!(f, " ON {on}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for ByItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if self.direction == OrderDirection::Desc {
            f.write_str(" DESC")?;
        }
        Ok(())
    }
}

fn write_tail(
    f: &mut Formatter<'_>,
    where_clause: Option<&ExprNode>,
    order_by: &[ByItem],
    limit: Option<&Limit>,
) -> fmt::Result {
    if let Some(cond) = where_clause {
        write!(f, " WHERE {cond}")?;
    }
    if !order_by.is_empty() {
        f.write_str(" ORDER BY ")?;
        write_list(f, order_by, ",")?;
    }
    if let Some(limit) = limit {
        write!(f, " LIMIT {}", limit.count)?;
        if let Some(offset) = &limit.offset {
            write!(f, " OFFSET {offset}")?;
        }
    }
    Ok(())
}

fn write_select(f: &mut Formatter<'_>, sel: &SelectStmt) -> fmt::Result {
    f.write_str("SELECT ")?;
    if sel.distinct {
        f.write_str("DISTINCT ")?;
    }
    write_list(f, &sel.fields, ",")?;
    if let Some(from) = &sel.from {
        write!(f, " FROM {from}")?;
    }
    if let Some(cond) = &sel.where_clause {
        write!(f, " WHERE {cond}")?;
    }
    if !sel.group_by.is_empty() {
        f.write_str(" GROUP BY ")?;
        write_list(f, &sel.group_by, ",")?;
    }
    if let Some(having) = &sel.having {
        write!(f, " HAVING {having}")?;
    }
    write_tail(f, None, &sel.order_by, sel.limit.as_ref())
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Select(sel) => write_select(f, sel),
            StmtKind::Insert(ins) => {
                let verb = if ins.is_replace { "REPLACE" } else { "INSERT" };
                write!(f, "{verb} INTO {}", ins.table)?;
                if !ins.columns.is_empty() {
                    f.write_str(" (")?;
                    write_list(f, &ins.columns, ",")?;
                    f.write_char(')')?;
                }
                if let Some(select) = &ins.select {
                    write!(f, " {select}")?;
                } else {
                    f.write_str(" VALUES ")?;
                    for (i, row) in ins.values.iter().enumerate() {
                        if i > 0 {
                            f.write_char(',')?;
                        }
                        f.write_char('(')?;
                        write_list(f, row, ",")?;
                        f.write_char(')')?;
                    }
                }
                for (i, a) in ins.on_duplicate.iter().enumerate() {
                    let lead = if i == 0 { " ON DUPLICATE KEY UPDATE " } else { "," };
                    write!(f, "{lead}{}={}", a.column, a.expr)?;
                }
                Ok(())
            }
            StmtKind::Update(upd) => {
                write!(f, "UPDATE {} SET ", upd.table)?;
                for (i, a) in upd.assignments.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{}={}", a.column, a.expr)?;
                }
                write_tail(
                    f,
                    upd.where_clause.as_ref(),
                    &upd.order_by,
                    upd.limit.as_ref(),
                )
            }
            StmtKind::Delete(del) => {
                write!(f, "DELETE FROM {}", del.table)?;
                write_tail(
                    f,
                    del.where_clause.as_ref(),
                    &del.order_by,
                    del.limit.as_ref(),
                )
            }
            StmtKind::CreateTable {
                if_not_exists,
                table,
                columns,
            } => {
                f.write_str("CREATE TABLE ")?;
                if *if_not_exists {
                    f.write_str("IF NOT EXISTS ")?;
                }
                write!(f, "{table} (")?;
                for (i, col) in columns.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{} {}", Ident(&col.name), col.tp.to_sql().to_uppercase())?;
                    if col.not_null {
                        f.write_str(" NOT NULL")?;
                    }
                    if let Some(default) = &col.default {
                        write!(f, " DEFAULT {default}")?;
                    }
                }
                f.write_char(')')
            }
            StmtKind::DropTable { if_exists, tables } => {
                f.write_str("DROP TABLE ")?;
                if *if_exists {
                    f.write_str("IF EXISTS ")?;
                }
                write_list(f, tables, ",")
            }
            StmtKind::CreateDatabase {
                if_not_exists,
                name,
            } => {
                f.write_str("CREATE DATABASE ")?;
                if *if_not_exists {
                    f.write_str("IF NOT EXISTS ")?;
                }
                write!(f, "{}", Ident(name))
            }
            StmtKind::Set(vars) => {
                f.write_str("SET ")?;
                for (i, var) in vars.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    if var.is_system {
                        f.write_str(if var.is_global { "@@GLOBAL." } else { "@@SESSION." })?;
                    } else {
                        f.write_char('@')?;
                    }
                    write!(f, "{}={}", Ident(&var.name), var.value)?;
                }
                Ok(())
            }
            StmtKind::Use(db) => write!(f, "USE {}", Ident(db)),
            StmtKind::Begin => f.write_str("START TRANSACTION"),
            StmtKind::Commit => f.write_str("COMMIT"),
            StmtKind::Rollback => f.write_str("ROLLBACK"),
        }
    }
}

impl ExprNode {
    /// Renders the expression as SQL text.
    #[must_use]
    pub fn restore(&self) -> String {
        self.to_string()
    }
}

impl Statement {
    /// Renders the statement as SQL text.
    #[must_use]
    pub fn restore(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Opcode;

    fn col(name: &str) -> ExprNode {
        ExprNode::column(name)
    }

    fn int(v: i64) -> ExprNode {
        ExprNode::value(v)
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(wrap_in_single_quotes("it's"), "'it''s'");
        assert_eq!(wrap_in_single_quotes("a\\b"), "'a\\\\b'");
        assert_eq!(unwrap_from_single_quotes("'it''s'"), "it's");
        assert_eq!(unwrap_from_single_quotes("'a\\\\b'"), "a\\b");
        assert_eq!(unwrap_from_single_quotes("abc"), "abc");
        assert_eq!(unwrap_from_single_quotes("'"), "'");
        assert_eq!(unwrap_from_single_quotes("''"), "");
    }

    #[test]
    fn test_restore_binary_ops() {
        assert_eq!(int(3).plus(int(5)).restore(), "3+5");
        assert_eq!(col("a").binary(Opcode::Ne, int(1)).restore(), "`a`!=1");
        assert_eq!(col("a").binary(Opcode::IntDiv, int(2)).restore(), "`a` DIV 2");
        assert_eq!(col("a").binary(Opcode::Mod, int(2)).restore(), "`a`%2");
        assert_eq!(
            ExprNode::value(1i64).and(ExprNode::value(0i64)).restore(),
            "1 AND 0"
        );
    }

    #[test]
    fn test_restore_predicates() {
        assert_eq!(col("a").is_not_null().restore(), "`a` IS NOT NULL");
        assert_eq!(
            col("b").not_between(int(1), int(2)).restore(),
            "`b` NOT BETWEEN 1 AND 2"
        );
        assert_eq!(
            col("a").in_list(vec![int(1), int(2)]).restore(),
            "`a` IN (1,2)"
        );
        assert_eq!(
            col("a").like(ExprNode::value("x%")).restore(),
            "`a` LIKE 'x%'"
        );
        assert_eq!(col("a").is_truth(false).restore(), "`a` IS FALSE");
    }

    #[test]
    fn test_restore_case() {
        let expr = ExprNode::case(Some(col("a")), vec![(int(1), int(2))], Some(int(3)));
        assert_eq!(expr.restore(), "CASE `a` WHEN 1 THEN 2 ELSE 3 END");
    }

    #[test]
    fn test_restore_functions() {
        assert_eq!(
            ExprNode::default_value(Some(ColumnName::new("i"))).restore(),
            "DEFAULT(`i`)"
        );
        assert_eq!(ExprNode::count_star().restore(), "COUNT(*)");
        assert_eq!(
            ExprNode::func("substring", vec![ExprNode::value("abc"), int(1)]).restore(),
            "SUBSTRING('abc', 1)"
        );
        let cast = int(1).cast(FieldType::new(MysqlType::Longlong).unsigned());
        assert_eq!(cast.restore(), "CAST(1 AS UNSIGNED)");
    }

    #[test]
    fn test_restore_identifiers() {
        assert_eq!(col("a`b").restore(), "`a``b`");
        assert_eq!(
            ExprNode::qualified_column("t", "c").restore(),
            "`t`.`c`"
        );
        assert_eq!(ExprNode::variable("v").restore(), "@`v`");
        assert_eq!(
            ExprNode::system_variable("autocommit", true).restore(),
            "@@GLOBAL.`autocommit`"
        );
    }

    #[test]
    fn test_restore_select() {
        let stmt = Statement::select(SelectStmt {
            fields: vec![SelectField::Expr {
                expr: col("a"),
                alias: Some("b".into()),
            }],
            from: Some(TableRef::table("t")),
            where_clause: Some(col("a").gt(int(1))),
            order_by: vec![ByItem {
                expr: col("a"),
                direction: OrderDirection::Desc,
            }],
            limit: Some(Limit {
                count: int(10),
                offset: None,
            }),
            ..SelectStmt::default()
        });
        assert_eq!(
            stmt.restore(),
            "SELECT `a` AS `b` FROM `t` WHERE `a`>1 ORDER BY `a` DESC LIMIT 10"
        );
    }

    #[test]
    fn test_restore_subquery() {
        let sub = ExprNode::subquery(Statement::select_exprs(vec![int(1)]));
        assert_eq!(
            int(1)
                .compare_subquery(Opcode::Eq, sub.clone(), false)
                .restore(),
            "1=ANY (SELECT 1)"
        );
        assert_eq!(ExprNode::exists(sub).restore(), "EXISTS (SELECT 1)");
    }
}
