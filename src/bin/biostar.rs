//! Biostar CLI: occurrence dumps into a star schema.
//!
//! Usage:
//!   biostar ingest <source> <raw>... [--db path]
//!   biostar dimensions | taxloc | facts [--db path]
//!   biostar run --config <yaml>
//!   biostar export <table> <out> [--sql-escape]
//!   biostar tables

use biostar::config::{default_db_path, validate_sigfigs};
use biostar::{
    export_table, Delimiter, ExportOptions, IdStrategy, InputConfig, OpenStore, Pipeline,
    PipelineConfig, SourceKind, SqliteStore, TableStore,
};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "biostar",
    version,
    about = "Normalize biodiversity occurrence dumps into a star schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Log every rejected record
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean raw dumps into cleaned/<source>
    Ingest {
        /// Dump format: vertnet, ebird or gbif
        source: SourceKind,
        /// Raw tab-delimited files
        #[arg(required = true)]
        raw: Vec<PathBuf>,
        /// Skip the first line of each file
        #[arg(long)]
        skip_header: bool,
        /// Decimal places kept for coordinates and precision
        #[arg(long, default_value_t = biostar::clean::DEFAULT_SIGFIGS, value_parser = parse_sigfigs)]
        sigfigs: usize,
    },
    /// Build dim/taxonomy and dim/location from the cleaned tables
    Dimensions {
        /// Derive surrogate ids from natural keys
        #[arg(long)]
        deterministic: bool,
    },
    /// Build dim/taxonomy_location from the dimensions
    Taxloc {
        /// Derive surrogate ids from natural keys
        #[arg(long)]
        deterministic: bool,
    },
    /// Build fact/<source> for every cleaned source
    Facts,
    /// Run every stage from a YAML config
    Run {
        #[arg(long)]
        config: PathBuf,
    },
    /// Write a table as delimited text
    Export {
        /// Table path, e.g. dim/taxonomy or fact/vertnet
        table: String,
        /// Output file; `.csv` selects comma separation
        out: PathBuf,
        /// Double single quotes for SQL loading
        #[arg(long)]
        sql_escape: bool,
        /// Omit the header line
        #[arg(long)]
        no_header: bool,
    },
    /// List materialized tables
    Tables,
}

fn parse_sigfigs(s: &str) -> Result<usize, String> {
    let sigfigs = s.parse::<usize>().map_err(|e| e.to_string())?;
    validate_sigfigs(sigfigs).map_err(|e| e.to_string())?;
    Ok(sigfigs)
}

fn strategy(deterministic: bool) -> IdStrategy {
    if deterministic {
        IdStrategy::Deterministic
    } else {
        IdStrategy::Random
    }
}

fn open_store(db: Option<PathBuf>) -> Result<Arc<SqliteStore>, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    let store = SqliteStore::open(&db_path)
        .map_err(|e| format!("Failed to open database {}: {}", db_path.display(), e))?;
    Ok(Arc::new(store))
}

fn cmd_ingest(pipeline: &Pipeline, source: SourceKind, raw: Vec<PathBuf>, skip_header: bool) -> i32 {
    let inputs: Vec<InputConfig> = raw
        .into_iter()
        .map(|path| InputConfig {
            source,
            path,
            skip_header,
        })
        .collect();
    match pipeline.ingest_stage(&inputs) {
        Ok(reports) => {
            for (source, report) in reports {
                println!(
                    "{}: {} lines, {} accepted, {} rejected ({} wrong width, {} invalid name, {} invalid coordinates)",
                    source,
                    report.lines,
                    report.accepted,
                    report.rejected(),
                    report.wrong_width,
                    report.invalid_name,
                    report.invalid_coordinates
                );
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_dimensions(pipeline: &Pipeline) -> i32 {
    match pipeline.dimension_stage() {
        Ok(report) => {
            println!("taxonomy: {} rows", report.taxonomy);
            println!("location: {} rows", report.locations);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_taxloc(pipeline: &Pipeline) -> i32 {
    match pipeline.taxloc_stage() {
        Ok(report) => {
            println!("taxonomy_location: {} rows", report.pairs);
            if report.misses > 0 {
                eprintln!("Warning: {} records did not resolve", report.misses);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_facts(pipeline: &Pipeline) -> i32 {
    match pipeline.fact_stage() {
        Ok(reports) => {
            for (source, report) in reports {
                println!("fact/{}: {} rows ({} dropped)", source, report.facts, report.dropped);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_run(db: Option<PathBuf>, config: PathBuf) -> i32 {
    let config = match PipelineConfig::load(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let store = match open_store(db.or_else(|| Some(config.database_path()))) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let pipeline = Pipeline::from_config(store, &config);
    match pipeline.run(&config.inputs) {
        Ok(report) => {
            print!("{}", report);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_export(store: &dyn TableStore, table: &str, out: &PathBuf, options: ExportOptions) -> i32 {
    let file = match File::create(out) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: cannot create '{}': {}", out.display(), e);
            return 1;
        }
    };
    let mut writer = BufWriter::new(file);
    match export_table(store, table, &mut writer, &options) {
        Ok(rows) => {
            println!("Exported {} rows of {} to {}", rows, table, out.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_tables(store: &dyn TableStore) -> i32 {
    let paths = match store.list_tables() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if paths.is_empty() {
        println!("No tables materialized.");
        return 0;
    }
    println!("{:<28}  {:>10}  {:<25}", "TABLE", "ROWS", "MATERIALIZED");
    println!("{}", "-".repeat(67));
    for path in paths {
        match store.table_info(&path) {
            Ok(Some(info)) => println!(
                "{:<28}  {:>10}  {:<25}",
                path,
                info.rows,
                info.materialized_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Ok(None) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }
    0
}

fn with_store(db: Option<PathBuf>, f: impl FnOnce(Arc<SqliteStore>) -> i32) -> i32 {
    match open_store(db) {
        Ok(store) => f(store),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let db = cli.db;
    let code = match cli.command {
        Commands::Run { config } => cmd_run(db, config),
        Commands::Ingest {
            source,
            raw,
            skip_header,
            sigfigs,
        } => with_store(db, |store| {
            let pipeline = Pipeline::with_store(store).sigfigs(sigfigs);
            cmd_ingest(&pipeline, source, raw, skip_header)
        }),
        Commands::Dimensions { deterministic } => with_store(db, |store| {
            cmd_dimensions(&Pipeline::with_store(store).id_strategy(strategy(deterministic)))
        }),
        Commands::Taxloc { deterministic } => with_store(db, |store| {
            cmd_taxloc(&Pipeline::with_store(store).id_strategy(strategy(deterministic)))
        }),
        Commands::Facts => with_store(db, |store| cmd_facts(&Pipeline::with_store(store))),
        Commands::Export {
            table,
            out,
            sql_escape,
            no_header,
        } => with_store(db, |store| {
            let options = ExportOptions {
                delimiter: Delimiter::for_path(&out),
                sql_escape,
                header: !no_header,
            };
            cmd_export(&*store, &table, &out, options)
        }),
        Commands::Tables => with_store(db, |store| cmd_tables(&*store)),
    };
    std::process::exit(code);
}
