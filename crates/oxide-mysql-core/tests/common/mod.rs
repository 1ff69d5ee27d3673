#![allow(dead_code)]

use oxide_mysql_core::ast::{set_flag, ExprNode, SelectField, Statement, StmtKind};
use oxide_mysql_core::context::{Context, ContextConfig, ContextFlags, Location};
use oxide_mysql_core::temporal::{parse_time, Time, TimeType};

pub fn strict() -> Context {
    Context::strict()
}

pub fn warn_ctx() -> Context {
    Context::new(
        ContextFlags::strict().with_truncate_as_warning(true),
        Location::Utc,
    )
}

pub fn ctx_from_json(json: &str) -> Context {
    ContextConfig::from_json(json)
        .and_then(|c| c.build())
        .unwrap_or_else(|e| panic!("bad config {json}: {e}"))
}

pub fn datetime(s: &str, fsp: i32) -> Time {
    parse_time(&mut strict(), s, TimeType::Datetime, fsp)
        .unwrap_or_else(|e| panic!("Failed to parse datetime {s}: {e:?}"))
}

pub fn elems(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

/// Runs the flag pass over `SELECT expr` and returns the field back.
pub fn flagged(expr: ExprNode) -> ExprNode {
    let mut stmt = Statement::select_exprs(vec![expr]);
    set_flag(&mut stmt);
    match stmt.kind {
        StmtKind::Select(mut sel) => match sel.fields.remove(0) {
            SelectField::Expr { expr, .. } => expr,
            other => panic!("Expected expression field, got {other:?}"),
        },
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn col(name: &str) -> ExprNode {
    ExprNode::column(name)
}

pub fn int(v: i64) -> ExprNode {
    ExprNode::value(v)
}

pub fn string(s: &str) -> ExprNode {
    ExprNode::value(s)
}

pub fn select_one() -> ExprNode {
    ExprNode::subquery(Statement::select_exprs(vec![int(1)]))
}
