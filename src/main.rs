//! `fdb` - inspect and patch FDB snapshots from the command line.
//!
//! ```bash
//! fdb cdclient.fdb tables
//! fdb cdclient.fdb schema Objects
//! fdb cdclient.fdb scan Objects --ge 1000 --lt 1010
//! fdb cdclient.fdb set Objects 1727 name "Brick" --output patched.fdb
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fdb_engine::{
    Assignment, DataKind, Database, LoadFlags, LoadOptions, Op, Predicate, RowHandle, RowView,
    TableHandle,
};

#[derive(Parser, Debug)]
#[command(name = "fdb", version, about = "Query and patch FDB database snapshots")]
struct Args {
    /// Path to the .fdb snapshot
    #[arg(env = "FDB_PATH")]
    path: PathBuf,

    /// Reject table and column names that are not valid UTF-8
    #[arg(long)]
    strict_names: bool,

    /// Expected CRC32 of the image, e.g. 0x1a2b3c4d
    #[arg(long, value_parser = parse_checksum)]
    checksum: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List table names in image order
    Tables,
    /// Print a table's columns
    Schema { table: String },
    /// Print rows, optionally narrowed on the key column
    Scan {
        table: String,
        #[arg(long, allow_hyphen_values = true)]
        gt: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        ge: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        eq: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        le: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        lt: Option<i64>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the row behind a handle
    Get { table: String, handle: u64 },
    /// Overwrite one column of a row and write the patched image
    Set {
        table: String,
        handle: u64,
        column: String,
        value: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the image CRC32
    Checksum,
}

fn parse_checksum(s: &str) -> std::result::Result<u32, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut options = LoadOptions::default();
    if args.strict_names {
        options.flags |= LoadFlags::STRICT_NAMES;
    }
    if let Some(expected) = args.checksum {
        options.flags |= LoadFlags::VERIFY_CHECKSUM;
        options.expected_checksum = Some(expected);
    }

    let source = fdb_engine::FileSource::new(&args.path);
    let mut db = Database::load_from_source(&source, &options)
        .with_context(|| format!("loading {}", args.path.display()))?;

    match args.command {
        Command::Tables => {
            for name in db.list_tables() {
                println!("{name}");
            }
        }
        Command::Schema { table } => {
            let handle = db.find_table(&table)?;
            let t = db.table(handle);
            println!("{}", t.desc.declaration());
            println!(
                "buckets: {}  rows: {}",
                t.hash_table.bucket_count(),
                t.row_count()
            );
        }
        Command::Scan {
            table,
            gt,
            ge,
            eq,
            le,
            lt,
            limit,
        } => {
            let handle = db.find_table(&table)?;
            let mut predicates = Vec::new();
            for (op, value) in [(Op::Gt, gt), (Op::Ge, ge), (Op::Eq, eq), (Op::Le, le), (Op::Lt, lt)] {
                if let Some(value) = value {
                    predicates.push(Predicate::key(op, value));
                }
            }
            print_header(&db, handle);
            let rows = db.scan(handle, &predicates);
            for (row_handle, row) in rows.take(limit.unwrap_or(usize::MAX)) {
                print_row(row_handle, &row);
            }
        }
        Command::Get { table, handle } => {
            let t = db.find_table(&table)?;
            let row = db.resolve_handle(t, RowHandle(handle))?;
            print_header(&db, t);
            print_row(RowHandle(handle), &row);
        }
        Command::Set {
            table,
            handle,
            column,
            value,
            output,
        } => {
            let t = db.find_table(&table)?;
            let Some(index) = db.table(t).desc.column_index(&column) else {
                bail!("table {table} has no column {column}");
            };
            // the kind stored in this row decides how the text is parsed
            let kind = db
                .resolve_handle(t, RowHandle(handle))?
                .get(index)?
                .kind();
            let assignment = parse_assignment(kind, &value)?;
            db.update(t, RowHandle(handle), index, &assignment)?;
            db.save(&output)?;
        }
        Command::Checksum => {
            println!("{:#010x}", db.checksum());
        }
    }

    Ok(())
}

fn parse_assignment(kind: DataKind, text: &str) -> Result<Assignment<'_>> {
    Ok(match kind {
        DataKind::Null => Assignment::Null,
        DataKind::Float32 => Assignment::Real(text.parse().context("expected a number")?),
        DataKind::StringInline | DataKind::StringOther => Assignment::Text(text),
        DataKind::Int32 | DataKind::UInt32 | DataKind::Bool | DataKind::Int64 | DataKind::UInt64 => {
            Assignment::Integer(text.parse().context("expected an integer")?)
        }
    })
}

fn print_header(db: &Database, table: TableHandle) {
    let names: Vec<&str> = db.columns(table).iter().map(|c| c.name.as_str()).collect();
    println!("handle\t{}", names.join("\t"));
}

fn print_row(handle: RowHandle, row: &RowView<'_>) {
    let values: Vec<String> = row.values().map(|v| v.to_string()).collect();
    println!("{handle}\t{}", values.join("\t"));
}
