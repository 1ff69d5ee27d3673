//! Tree walks: clause order, skipping, stopping and in-place rewrites.

mod common;
use common::*;

use oxide_mysql_core::ast::{
    ByItem, Enter, ExprKind, ExprNode, InsertStmt, JoinType, Leave, Limit, Node, SelectField,
    SelectStmt, Span, Statement, StmtKind, TableName, TableRef, Visitor,
};
use oxide_mysql_core::charset::find_encoding;
use oxide_mysql_core::types::Value;

/// Records the leaves it sees: column names and literal values.
#[derive(Default)]
struct LeafRecorder {
    seen: Vec<String>,
    statements: usize,
}

impl Visitor for LeafRecorder {
    fn enter_expr(&mut self, expr: &mut ExprNode) -> Enter<ExprNode> {
        match &expr.kind {
            ExprKind::Column(c) => self.seen.push(c.name.clone()),
            ExprKind::Value(v) => self.seen.push(v.to_string()),
            _ => {}
        }
        Enter::Continue
    }

    fn enter_stmt(&mut self, _stmt: &mut Statement) -> Enter<Statement> {
        self.statements += 1;
        Enter::Continue
    }
}

fn full_select() -> Statement {
    let from = TableRef::table("t1").join(
        JoinType::Left,
        TableRef::table("t2"),
        Some(ExprNode::qualified_column("t1", "x").eq(ExprNode::qualified_column("t2", "y"))),
    );
    Statement::select(SelectStmt {
        distinct: false,
        fields: vec![SelectField::expr(col("a")), SelectField::Wildcard { table: None }],
        from: Some(from),
        where_clause: Some(col("b")),
        group_by: vec![ByItem::new(col("c"))],
        having: Some(col("d")),
        order_by: vec![ByItem::new(col("e"))],
        limit: Some(Limit {
            count: int(10),
            offset: Some(int(20)),
        }),
    })
}

#[test]
fn select_clause_order() {
    let mut stmt = full_select();
    let mut rec = LeafRecorder::default();
    assert!(stmt.accept(&mut rec));
    assert_eq!(rec.seen, ["a", "x", "y", "b", "c", "d", "e", "10", "20"]);
    assert_eq!(rec.statements, 1);
}

#[test]
fn walk_descends_into_subqueries() {
    let mut expr = col("a").in_subquery(ExprNode::subquery(Statement::select_exprs(vec![
        col("b"),
    ])));
    let mut rec = LeafRecorder::default();
    assert!(expr.accept(&mut rec));
    assert_eq!(rec.seen, ["a", "b"]);
    assert_eq!(rec.statements, 1);
}

#[test]
fn insert_rows_and_on_duplicate() {
    let mut stmt = Statement::new(StmtKind::Insert(InsertStmt {
        is_replace: false,
        table: TableName::new("t"),
        columns: vec![],
        values: vec![vec![int(1), int(2)], vec![int(3), int(4)]],
        select: None,
        on_duplicate: vec![oxide_mysql_core::ast::Assignment {
            column: oxide_mysql_core::ast::ColumnName::new("a"),
            expr: int(5),
        }],
    }));
    let mut rec = LeafRecorder::default();
    assert!(stmt.accept(&mut rec));
    assert_eq!(rec.seen, ["1", "2", "3", "4", "5"]);
}

#[test]
fn skip_children_still_leaves() {
    #[derive(Default)]
    struct SkipSubqueries {
        entered: usize,
        left_subqueries: usize,
    }

    impl Visitor for SkipSubqueries {
        fn enter_expr(&mut self, expr: &mut ExprNode) -> Enter<ExprNode> {
            self.entered += 1;
            if matches!(expr.kind, ExprKind::Subquery(_)) {
                return Enter::SkipChildren;
            }
            Enter::Continue
        }

        fn leave_expr(&mut self, expr: &mut ExprNode) -> Leave<ExprNode> {
            if matches!(expr.kind, ExprKind::Subquery(_)) {
                self.left_subqueries += 1;
            }
            Leave::Continue
        }
    }

    let mut expr = ExprNode::exists(select_one());
    let mut v = SkipSubqueries::default();
    assert!(expr.accept(&mut v));
    // EXISTS and its subquery, but not the `1` inside.
    assert_eq!(v.entered, 2);
    assert_eq!(v.left_subqueries, 1);
}

#[test]
fn stop_aborts_walk() {
    #[derive(Default)]
    struct StopAtB {
        left: Vec<String>,
    }

    impl Visitor for StopAtB {
        fn leave_expr(&mut self, expr: &mut ExprNode) -> Leave<ExprNode> {
            let label = match &expr.kind {
                ExprKind::Column(c) => c.name.clone(),
                _ => "op".to_string(),
            };
            self.left.push(label.clone());
            if label == "b" {
                return Leave::Stop;
            }
            Leave::Continue
        }
    }

    let mut expr = col("a").plus(col("b")).plus(col("c"));
    let mut v = StopAtB::default();
    assert!(!expr.accept(&mut v));
    assert_eq!(v.left, ["a", "b"]);
}

#[test]
fn enter_replace_walks_replacement() {
    struct ExpandA {
        seen: Vec<String>,
    }

    impl Visitor for ExpandA {
        fn enter_expr(&mut self, expr: &mut ExprNode) -> Enter<ExprNode> {
            if let ExprKind::Column(c) = &expr.kind {
                self.seen.push(c.name.clone());
                if c.name == "a" {
                    return Enter::Replace(col("b").plus(col("c")));
                }
            }
            Enter::Continue
        }
    }

    let mut expr = col("a").paren();
    let mut v = ExpandA { seen: Vec::new() };
    assert!(expr.accept(&mut v));
    assert_eq!(v.seen, ["a", "b", "c"]);
    assert_eq!(expr.restore(), "(`b`+`c`)");
}

#[test]
fn leave_replace_rewrites_statement() {
    struct InlineParams;

    impl Visitor for InlineParams {
        fn leave_expr(&mut self, expr: &mut ExprNode) -> Leave<ExprNode> {
            if let ExprKind::ParamMarker { order } = expr.kind {
                let order = i64::try_from(order).unwrap_or_default();
                return Leave::Replace(ExprNode::value(order + 100));
            }
            Leave::Continue
        }
    }

    let mut stmt = Statement::select(SelectStmt {
        fields: vec![SelectField::expr(col("a"))],
        from: Some(TableRef::table("t")),
        where_clause: Some(col("a").eq(ExprNode::param(0))),
        ..SelectStmt::default()
    });
    assert!(stmt.accept(&mut InlineParams));
    assert_eq!(stmt.restore(), "SELECT `a` FROM `t` WHERE `a`=100");
}

#[test]
fn statement_replace_on_leave() {
    struct BeginToCommit;

    impl Visitor for BeginToCommit {
        fn leave_stmt(&mut self, stmt: &mut Statement) -> Leave<Statement> {
            if stmt.kind == StmtKind::Begin {
                return Leave::Replace(Statement::new(StmtKind::Commit));
            }
            Leave::Continue
        }
    }

    let mut stmt = Statement::new(StmtKind::Begin);
    assert!(stmt.accept(&mut BeginToCommit));
    assert_eq!(stmt.kind, StmtKind::Commit);
}

#[test]
fn node_text_is_decoded_from_charset() {
    let mut expr = ExprNode::value(Value::from("caf\u{e9}"));
    expr.base.span = Span::new(7, 12);
    expr.set_text(find_encoding("latin1"), b"'caf\xe9'");
    assert_eq!(expr.text(), "'caf\u{e9}'");
    assert_eq!(expr.base().original_text(), b"'caf\xe9'");
    assert_eq!(expr.base().origin_text_position(), 7);

    let mut stmt = Statement::select_exprs(vec![expr]);
    stmt.set_text(None, b"select 'caf\xc3\xa9'");
    assert_eq!(stmt.text(), "select 'caf\u{e9}'");
}
