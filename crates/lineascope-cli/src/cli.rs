//! CLI argument parsing using clap.
//!
//! Traversal direction defaults: the engine takes explicit booleans only,
//! so the default lives here — both directions are traversed unless
//! `--no-up` / `--no-down` switch one off.

use clap::{Parser, Subcommand, ValueEnum};
use lineascope_core::EntityKind;
use std::path::PathBuf;

/// Lineascope - lineage explorer for analytics platform metadata
#[derive(Parser, Debug)]
#[command(name = "lineascope")]
#[command(about = "Explore dataset, dataflow, and card lineage", long_about = None)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the lineage graph around an entity and render it
    Lineage(LineageArgs),
    /// List the direct parents of an entity
    Parents(NeighborArgs),
    /// List the direct children of an entity
    Children(NeighborArgs),
    /// Show metadata about a snapshot file
    SnapshotInfo(SnapshotInfoArgs),
}

#[derive(clap::Args, Debug)]
pub struct LineageArgs {
    /// Entity id (dataset GUID, or dataflow/card id)
    pub id: String,

    /// Entity kind of the root
    #[arg(short, long, default_value = "dataset", value_enum)]
    pub kind: KindArg,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Do not traverse toward producers (ancestors)
    #[arg(long)]
    pub no_up: bool,

    /// Do not traverse toward consumers (descendants)
    #[arg(long)]
    pub no_down: bool,

    /// Maximum hops from the root
    #[arg(long, default_value = "8")]
    pub depth: usize,

    /// Maximum nodes recorded before the build stops
    #[arg(long, default_value = "500")]
    pub max_nodes: usize,

    /// Comma-separated entity kinds to keep in the output
    /// (e.g. dataset,card); all kinds when omitted
    #[arg(long, value_delimiter = ',', value_enum)]
    pub entities: Vec<KindArg>,

    /// Metadata snapshot file backing the entity store
    #[arg(short, long, value_name = "FILE", required_unless_present = "remote_file")]
    pub snapshot: Option<PathBuf>,

    /// Saved remote lineage response to merge instead of building locally
    #[arg(long, value_name = "FILE")]
    pub remote_file: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,
}

#[derive(clap::Args, Debug)]
pub struct NeighborArgs {
    /// Entity id
    pub id: String,

    /// Entity kind
    #[arg(short, long, default_value = "dataset", value_enum)]
    pub kind: KindArg,

    /// Output format (table or json)
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Metadata snapshot file backing the entity store
    #[arg(short, long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compact JSON output
    #[arg(short, long)]
    pub compact: bool,
}

#[derive(clap::Args, Debug)]
pub struct SnapshotInfoArgs {
    /// Metadata snapshot file
    #[arg(value_name = "FILE")]
    pub snapshot: PathBuf,
}

/// Entity kind options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Dataset,
    Dataflow,
    Card,
    Alert,
}

impl From<KindArg> for EntityKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Dataset => EntityKind::Dataset,
            KindArg::Dataflow => EntityKind::Dataflow,
            KindArg::Card => EntityKind::Card,
            KindArg::Alert => EntityKind::Alert,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Table,
    /// Indented tree text
    Text,
    /// Mermaid diagram source
    Mermaid,
    /// JSON output
    Json,
}
