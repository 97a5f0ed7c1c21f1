//! `dynjson` CLI: parse, query and cast JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Validate and re-serialize (stdin → stdout)
//! echo '{"user_name":"ada"}' | dynjson parse --pretty --camel-case
//!
//! # Select a node by path
//! dynjson get 'events[0].start' -i calendar.json
//!
//! # Cast a scalar document
//! echo '"1234"' | dynjson cast i16
//! echo '1234567890' | dynjson cast datetime --date-format epoch-seconds
//!
//! # Inspect a date-time string
//! dynjson date '2009-W01-1T08:00+01:00'
//!
//! # Echo every document of a concatenated stream, one per line
//! dynjson stream -i events.ndjson
//!
//! # Load format options from a file; flags override it
//! dynjson parse --options options.json --pretty
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dynjson_core::{
    deserialize_dynamic_from, deserialize_stream_from, to_json, write_value, DynamicValue,
    FormatOptions, FromDynamic, ToJson,
};
use dynjson_temporal::{
    format_datetime, parse_datetime, DateFormat, TemporalResult, UnspecifiedOffsetPolicy,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dynjson",
    version,
    about = "Parse, query and cast JSON with on-demand type coercion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    format: FormatArgs,
}

/// Format options shared by every subcommand.
#[derive(Args)]
struct FormatArgs {
    /// JSON file holding format options (flags below override it)
    #[arg(long, global = true)]
    options: Option<String>,
    /// How date-times are read and written
    #[arg(long, global = true, value_enum)]
    date_format: Option<DateFormatArg>,
    /// How ISO-8601 text without an offset is resolved
    #[arg(long, global = true, value_enum)]
    unspecified: Option<UnspecifiedArg>,
    /// Indent output with two spaces
    #[arg(long, global = true)]
    pretty: bool,
    /// Rewrite member names to lowerCamelCase on output
    #[arg(long, global = true)]
    camel_case: bool,
}

#[derive(Args)]
struct IoArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON document and write it back out
    Parse {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Print the node at a path such as `a.b[2]` or `[0].name`
    Get {
        path: String,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Cast a scalar JSON document to a concrete type and print the result
    Cast {
        #[arg(value_enum)]
        target: CastTarget,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Parse date-time text under the selected date format
    Date { text: String },
    /// Echo each document of a concatenated JSON stream on its own line
    Stream {
        /// Print only the number of documents
        #[arg(long)]
        count: bool,
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DateFormatArg {
    Iso8601,
    EpochSeconds,
    EpochMilliseconds,
    LegacyTicks,
    Rfc1123,
}

impl From<DateFormatArg> for DateFormat {
    fn from(arg: DateFormatArg) -> Self {
        match arg {
            DateFormatArg::Iso8601 => DateFormat::Iso8601,
            DateFormatArg::EpochSeconds => DateFormat::EpochSeconds,
            DateFormatArg::EpochMilliseconds => DateFormat::EpochMilliseconds,
            DateFormatArg::LegacyTicks => DateFormat::LegacyTicks,
            DateFormatArg::Rfc1123 => DateFormat::Rfc1123,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UnspecifiedArg {
    AssumeLocal,
    AssumeUtc,
    Error,
}

impl From<UnspecifiedArg> for UnspecifiedOffsetPolicy {
    fn from(arg: UnspecifiedArg) -> Self {
        match arg {
            UnspecifiedArg::AssumeLocal => UnspecifiedOffsetPolicy::AssumeLocal,
            UnspecifiedArg::AssumeUtc => UnspecifiedOffsetPolicy::AssumeUtc,
            UnspecifiedArg::Error => UnspecifiedOffsetPolicy::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CastTarget {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Bool,
    String,
    Datetime,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let options = resolve_options(&cli.format)?;

    match cli.command {
        Commands::Parse { io } => {
            debug!(input = io.input.as_deref().unwrap_or("-"), "parse");
            let doc = deserialize_dynamic_from(open_input(io.input.as_deref())?, options)
                .map_err(parse_failure)?;
            info!(kind = %doc.root().kind(), "parsed document");
            write_output(io.output.as_deref(), &doc.root().to_string())?;
        }
        Commands::Get { path, io } => {
            debug!(%path, "get");
            let doc = deserialize_dynamic_from(open_input(io.input.as_deref())?, options)
                .map_err(parse_failure)?;
            let node = select(doc.root(), &path)?;
            info!(kind = %node.kind(), "selected node");
            write_output(io.output.as_deref(), &node.to_string())?;
        }
        Commands::Cast { target, io } => {
            debug!(?target, "cast");
            let doc = deserialize_dynamic_from(open_input(io.input.as_deref())?, options)
                .map_err(parse_failure)?;
            let text = cast(doc.root(), target, &options)
                .with_context(|| {
                    let name = format!("{:?}", target).to_lowercase();
                    format!("Failed to cast {} to {}", doc.root().kind(), name)
                })?;
            write_output(io.output.as_deref(), &text)?;
        }
        Commands::Date { text } => {
            debug!(%text, "date");
            let report = describe_date(&text, &options)
                .with_context(|| format!("Failed to parse date '{}'", text))?;
            let rendered = if options.pretty_print {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            write_output(None, &rendered)?;
        }
        Commands::Stream { count, io } => {
            let mut out = String::new();
            let mut documents = 0usize;
            for item in deserialize_stream_from(open_input(io.input.as_deref())?) {
                let value = item
                    .map_err(parse_failure)
                    .with_context(|| format!("Failed to read document {}", documents + 1))?;
                documents += 1;
                if !count {
                    out.push_str(&write_value(&value, &options));
                    out.push('\n');
                }
            }
            info!(documents, "stream complete");
            if count {
                out = format!("{}\n", documents);
            }
            write_output(io.output.as_deref(), out.trim_end_matches('\n'))?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Options file first, then individual flags on top.
fn resolve_options(args: &FormatArgs) -> Result<FormatOptions> {
    let mut options = match args.options.as_deref() {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file: {}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid options file: {}", path))?
        }
        None => FormatOptions::default(),
    };

    if let Some(format) = args.date_format {
        options.date_format = format.into();
    }
    if let Some(policy) = args.unspecified {
        options.unspecified_offset = policy.into();
    }
    if args.pretty {
        options.pretty_print = true;
    }
    if args.camel_case {
        options.camel_case = true;
    }

    debug!(?options, "resolved format options");
    Ok(options)
}

/// Attach the error position to a parse failure.
fn parse_failure(err: dynjson_core::Error) -> anyhow::Error {
    let location = err
        .position()
        .map(|position| format!(" at {}", position))
        .unwrap_or_default();
    anyhow::Error::new(err).context(format!("Failed to parse JSON{}", location))
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Step<'p> {
    Member(&'p str),
    Index(usize),
}

/// Split `a.b[2][0].c` into member and index steps. An empty path or `.`
/// selects the root.
fn parse_path(path: &str) -> Result<Vec<Step<'_>>> {
    let mut steps = Vec::new();
    let trimmed = path.strip_prefix('.').unwrap_or(path);
    if trimmed.is_empty() {
        return Ok(steps);
    }

    for segment in trimmed.split('.') {
        let (name, mut rest) = match segment.find('[') {
            Some(at) => segment.split_at(at),
            None => (segment, ""),
        };
        if name.is_empty() && rest.is_empty() {
            bail!("Empty segment in path '{}'", path);
        }
        if !name.is_empty() {
            steps.push(Step::Member(name));
        }
        while !rest.is_empty() {
            let close = rest
                .find(']')
                .with_context(|| format!("Unclosed '[' in path '{}'", path))?;
            let digits = &rest[1..close];
            let index = digits
                .parse()
                .with_context(|| format!("Invalid index '{}' in path '{}'", digits, path))?;
            steps.push(Step::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                bail!("Unexpected '{}' in path '{}'", rest, path);
            }
        }
    }
    Ok(steps)
}

fn select<'a>(root: DynamicValue<'a>, path: &str) -> Result<DynamicValue<'a>> {
    let mut node = root;
    for step in parse_path(path)? {
        node = match step {
            Step::Member(name) => node.member(name),
            Step::Index(index) => node.index(index),
        }
        .with_context(|| format!("Failed to resolve path '{}'", path))?;
    }
    Ok(node)
}

// ---------------------------------------------------------------------------
// Casts and dates
// ---------------------------------------------------------------------------

fn cast_as<T: FromDynamic + ToJson>(
    value: DynamicValue<'_>,
    options: &FormatOptions,
) -> dynjson_core::Result<String> {
    to_json(&value.cast::<T>()?, options)
}

fn cast(
    value: DynamicValue<'_>,
    target: CastTarget,
    options: &FormatOptions,
) -> dynjson_core::Result<String> {
    match target {
        CastTarget::I8 => cast_as::<i8>(value, options),
        CastTarget::I16 => cast_as::<i16>(value, options),
        CastTarget::I32 => cast_as::<i32>(value, options),
        CastTarget::I64 => cast_as::<i64>(value, options),
        CastTarget::U8 => cast_as::<u8>(value, options),
        CastTarget::U16 => cast_as::<u16>(value, options),
        CastTarget::U32 => cast_as::<u32>(value, options),
        CastTarget::U64 => cast_as::<u64>(value, options),
        CastTarget::F32 => cast_as::<f32>(value, options),
        CastTarget::F64 => cast_as::<f64>(value, options),
        CastTarget::Decimal => cast_as::<Decimal>(value, options),
        CastTarget::Bool => cast_as::<bool>(value, options),
        CastTarget::String => cast_as::<String>(value, options),
        CastTarget::Datetime => cast_as::<DateTime<Utc>>(value, options),
    }
}

/// The fields as written (ISO-8601 only) alongside the resolved instant.
fn describe_date(text: &str, options: &FormatOptions) -> Result<serde_json::Value> {
    let instant = options
        .date_format
        .parse_text(text, options.unspecified_offset)?;
    let fields = match options.date_format {
        DateFormat::Iso8601 => parse_datetime(text)?,
        _ => TemporalResult::from_utc(instant),
    };
    Ok(serde_json::json!({
        "fields": fields,
        "utc": format_datetime(&TemporalResult::from_utc(instant), options.iso_format),
        "epoch_seconds": instant.timestamp(),
    }))
}

// ---------------------------------------------------------------------------
// I/O
// ---------------------------------------------------------------------------

fn open_input(path: Option<&str>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to read file: {}", path))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{}\n", content))
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
