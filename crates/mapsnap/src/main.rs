//! mapsnap CLI
//!
//! Command-line tool for snapshotting ORM mapping sources.

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use mapsnap::prelude::*;

/// Snapshot ORM mapping sources as if they were live databases.
#[derive(Parser)]
#[command(name = "mapsnap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Mapping source URL (e.g. hibernate:classic:mapping.json?dialect=h2).
    #[arg(short, long, env = "MAPSNAP_URL")]
    url: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a schema and print it.
    Snapshot {
        /// Schema to resolve (the default schema if not specified).
        #[arg(short, long, env = "MAPSNAP_SCHEMA")]
        schema: Option<String>,

        /// Object types to leave out of the snapshot.
        #[arg(short, long, value_enum)]
        exclude: Vec<Scope>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Show what the URL resolves to without taking a snapshot.
    Describe,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scope {
    Table,
    Column,
}

impl From<Scope> for ObjectType {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Table => Self::Table,
            Scope::Column => Self::Column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
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

    let session = Bootstrap::default().open(&cli.url)?;

    match cli.command {
        Commands::Snapshot {
            schema,
            exclude,
            format,
        } => {
            let control = exclude
                .into_iter()
                .fold(SnapshotControl::all(), |control, scope| {
                    control.excluding(scope.into())
                });
            let schema = match schema {
                Some(name) => session.snapshot_schema(&name, control)?,
                None => session.snapshot_default_schema(control)?,
            };
            info!("Resolved {} table(s) in schema {}", schema.tables().count(), schema.name);

            let report = SnapshotReport::new(&session, schema);
            match format {
                Format::Json => println!("{}", report.to_json()?),
                Format::Text => print!("{report}"),
            }
        }

        Commands::Describe => {
            let url = session.url();
            let model = session.model();
            let physical = model.tables.iter().filter(|t| t.is_physical_table).count();
            let roots = model.entities.iter().filter(|e| !e.is_inherited).count();

            println!("\nMapping source:");
            println!("{:-<60}", "");
            println!(" source:          {} ({})", url.kind().product_name(), url.kind());
            println!(" path:            {}", url.path());
            println!(" dialect:         {}", session.config().dialect);
            println!(" naming strategy: {}", session.naming());
            println!(" default schema:  {}", session.config().default_schema);
            println!(
                " tables:          {} ({} physical)",
                model.tables.len(),
                physical
            );
            println!(
                " entities:        {} ({} root)",
                model.entities.len(),
                roots
            );
            println!();
        }
    }

    Ok(())
}
