//! oxide-mysql CLI
//!
//! Parses MySQL literals the way a server would and prints the typed
//! result, the error and its code on failure, and the warnings the
//! context collected.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_mysql_core::context::{Context, ContextConfig};
use oxide_mysql_core::convert::{str_to_float, str_to_int, str_to_uint};
use oxide_mysql_core::error::{Error, LossyResult};
use oxide_mysql_core::temporal::{get_fsp, parse_duration, parse_time, TimeType};
use oxide_mysql_core::types::{parse_enum, parse_set, Value};

/// MySQL literal parsing from the command line.
#[derive(Parser)]
#[command(name = "oxide-mysql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session time zone: UTC, SYSTEM or a fixed offset such as +08:00.
    #[arg(long, env = "OXIDE_MYSQL_TIME_ZONE")]
    time_zone: Option<String>,

    /// Accept truncated values and report them as warnings.
    #[arg(long, env = "OXIDE_MYSQL_TRUNCATE_AS_WARNING")]
    truncate_as_warning: bool,

    /// Accept truncated values silently.
    #[arg(long, env = "OXIDE_MYSQL_IGNORE_TRUNCATE")]
    ignore_truncate: bool,

    /// Accept days that do not exist in their month.
    #[arg(long, env = "OXIDE_MYSQL_ALLOW_INVALID_DATE")]
    allow_invalid_date: bool,

    /// Accept a zero month or day.
    #[arg(long, env = "OXIDE_MYSQL_ALLOW_ZERO_IN_DATE")]
    allow_zero_in_date: bool,

    /// JSON context configuration, applied before the flags above.
    #[arg(short, long, env = "OXIDE_MYSQL_CONFIG")]
    config: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a DATE, DATETIME or TIMESTAMP literal.
    Datetime {
        /// The literal.
        literal: String,

        /// Fractional seconds precision.
        #[arg(long, default_value_t = 0)]
        fsp: i32,

        /// Target type.
        #[arg(long = "type", value_enum, default_value_t = TemporalType::Datetime)]
        tp: TemporalType,
    },

    /// Parse a TIME literal.
    Duration {
        /// The literal.
        literal: String,

        /// Fractional seconds precision.
        #[arg(long, default_value_t = 0)]
        fsp: i32,
    },

    /// Convert a string to a number.
    Number {
        /// The literal.
        literal: String,

        /// Convert to BIGINT UNSIGNED.
        #[arg(long, conflicts_with = "float")]
        unsigned: bool,

        /// Convert to DOUBLE.
        #[arg(long)]
        float: bool,
    },

    /// Resolve an ENUM member by name or ordinal.
    Enum {
        /// Member name or 1-based ordinal.
        name: String,

        /// Comma-separated members.
        #[arg(long, value_delimiter = ',')]
        elems: Vec<String>,

        /// Collation used to compare names.
        #[arg(long, default_value = "utf8mb4_bin")]
        collation: String,
    },

    /// Resolve a SET value by member list or bitmask.
    Set {
        /// Comma-separated members or a bitmask.
        name: String,

        /// Comma-separated members.
        #[arg(long, value_delimiter = ',')]
        elems: Vec<String>,

        /// Collation used to compare names.
        #[arg(long, default_value = "utf8mb4_bin")]
        collation: String,
    },

    /// Parse a DATETIME literal and render it with a DATE_FORMAT layout.
    Format {
        /// The literal.
        literal: String,

        /// The layout, e.g. `%Y-%m-%d`.
        layout: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TemporalType {
    Date,
    Datetime,
    Timestamp,
}

impl From<TemporalType> for TimeType {
    fn from(tp: TemporalType) -> Self {
        match tp {
            TemporalType::Date => Self::Date,
            TemporalType::Datetime => Self::Datetime,
            TemporalType::Timestamp => Self::Timestamp,
        }
    }
}

/// An error or warning as printed.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct Report {
    code: u16,
    message: String,
}

impl From<&Error> for Report {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// What a command produced.
#[derive(Debug, Serialize)]
struct Outcome {
    value: Option<Value>,
    error: Option<Report>,
    warnings: Vec<Report>,
}

impl Outcome {
    fn ok(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            error: None,
            warnings: Vec::new(),
        }
    }

    fn failed(value: Option<Value>, err: &Error) -> Self {
        Self {
            value,
            error: Some(Report::from(err)),
            warnings: Vec::new(),
        }
    }

    fn from_lossy<T: Into<Value>>(res: LossyResult<T>) -> Self {
        match res {
            Ok(v) => Self::ok(v),
            Err(lossy) => Self::failed(Some(lossy.value.into()), &lossy.error),
        }
    }

    fn from_result<T: Into<Value>>(res: Result<T, Error>) -> Self {
        match res {
            Ok(v) => Self::ok(v),
            Err(err) => Self::failed(None, &err),
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<ContextConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    Ok(ContextConfig::from_json(&json)?)
}

/// The config file first, then explicit flags on top.
fn load_config(cli: &Cli) -> anyhow::Result<ContextConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ContextConfig::default(),
    };
    if let Some(tz) = &cli.time_zone {
        config.time_zone.clone_from(tz);
    }
    let flags = &mut config.flags;
    flags.truncate_as_warning |= cli.truncate_as_warning;
    flags.ignore_truncate_err |= cli.ignore_truncate;
    flags.ignore_invalid_date_err |= cli.allow_invalid_date;
    flags.ignore_zero_in_date |= cli.allow_zero_in_date;
    Ok(config)
}

fn run(ctx: &mut Context, command: &Commands) -> Outcome {
    let mut outcome = match command {
        Commands::Datetime { literal, fsp, tp } => {
            Outcome::from_lossy(parse_time(ctx, literal, (*tp).into(), *fsp))
        }
        Commands::Duration { literal, fsp } => match parse_duration(ctx, literal, *fsp) {
            Ok(d) => Outcome::ok(d),
            Err(lossy) => Outcome::failed(lossy.value.map(Value::from), &lossy.error),
        },
        Commands::Number {
            literal,
            unsigned,
            float,
        } => {
            if *float {
                Outcome::from_lossy(str_to_float(ctx, literal, false))
            } else if *unsigned {
                Outcome::from_lossy(str_to_uint(ctx, literal, false))
            } else {
                Outcome::from_lossy(str_to_int(ctx, literal, false))
            }
        }
        Commands::Enum {
            name,
            elems,
            collation,
        } => Outcome::from_result(parse_enum(elems, name, collation).map(Value::Enum)),
        Commands::Set {
            name,
            elems,
            collation,
        } => Outcome::from_result(parse_set(elems, name, collation).map(Value::Set)),
        Commands::Format { literal, layout } => {
            match parse_time(ctx, literal, TimeType::Datetime, get_fsp(literal)) {
                Ok(t) => Outcome::from_result(t.date_format(layout)),
                Err(lossy) => Outcome::failed(None, &lossy.error),
            }
        }
    };
    outcome.warnings = ctx.warnings().iter().map(Report::from).collect();
    outcome
}

fn print(outcome: &Outcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    if let Some(value) = &outcome.value {
        println!("{value}");
    }
    if let Some(err) = &outcome.error {
        eprintln!("ERROR {}: {}", err.code, err.message);
    }
    for warning in &outcome.warnings {
        eprintln!("Warning {}: {}", warning.code, warning.message);
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    debug!(?config, "loaded context configuration");
    let mut ctx = config.build()?;

    let outcome = run(&mut ctx, &cli.command);
    print(&outcome, cli.json)?;
    Ok(if outcome.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
