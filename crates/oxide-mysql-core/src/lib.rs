//! # oxide-mysql-core
//!
//! The value layer and AST backbone of a MySQL-dialect SQL front end.
//!
//! This crate provides:
//! - Packed DATE/DATETIME/TIMESTAMP values and a TIME duration, with the
//!   lenient literal parsers MySQL uses
//! - Overflow-safe numeric conversions with MySQL's clamping and
//!   truncation rules
//! - ENUM and SET resolution under a collation
//! - Expression and statement nodes, a visitor protocol and the flag pass
//!
//! Every parse and conversion takes an explicit [`Context`] holding the
//! time zone and the truncation policy. Results that are usable but lossy
//! come back as [`Lossy`] values carrying both the best-effort result and
//! the error.
//!
//! ## Parsing literals
//!
//! ```rust
//! use oxide_mysql_core::context::Context;
//! use oxide_mysql_core::temporal::{parse_time, TimeType};
//!
//! let mut ctx = Context::strict();
//! let t = parse_time(&mut ctx, "2024-01-02 03:04:05", TimeType::Datetime, 0).unwrap();
//! assert_eq!(t.to_string(), "2024-01-02 03:04:05");
//! ```
//!
//! ## Walking expressions
//!
//! ```rust
//! use oxide_mysql_core::ast::{flag, set_flag, ExprNode};
//!
//! let mut expr = ExprNode::column("a").plus(ExprNode::param(0));
//! set_flag(&mut expr);
//! assert_eq!(expr.flag(), flag::HAS_REFERENCE | flag::HAS_PARAM_MARKER);
//! assert_eq!(expr.restore(), "`a`+?");
//! ```

pub mod ast;
pub mod charset;
pub mod context;
pub mod convert;
pub mod error;
pub mod mysql;
pub mod temporal;
pub mod types;

pub use ast::{ExprNode, Statement};
pub use context::{Context, ContextConfig, ContextFlags, Location};
pub use error::{Error, Lossy, LossyResult, Result};
pub use mysql::{FieldType, MysqlType};
pub use temporal::{Duration, Time, TimeType};
pub use types::{EnumValue, SetValue, Value};
