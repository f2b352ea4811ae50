//! Lineascope CLI - lineage explorer for analytics platform metadata

use lineascope_cli::cli::{
    Args, Command, KindArg, LineageArgs, NeighborArgs, OutputFormat, SnapshotInfoArgs,
};
use lineascope_cli::output;
use lineascope_cli::snapshot::SnapshotStore;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use lineascope_core::{
    compute_traversal, direct_children, direct_parents, merge_remote_lineage, render_filtered,
    BuildOptions, EntityKind, GraphBuilder, KindFilter, LineageError, LineageGraph, RenderFormat,
};
use owo_colors::OwoColorize;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

/// No such entity, or no lineage data for it.
const EXIT_FAILURE: u8 = 1;
/// Configuration error (bad arguments, unreadable files).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lineascope: error: {e:#}");
            let missing_data = e.downcast_ref::<LineageError>().is_some_and(|err| {
                matches!(
                    err,
                    LineageError::NotFound { .. } | LineageError::NoLineageData { .. }
                )
            });
            if missing_data {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::from(EXIT_CONFIG_ERROR)
            }
        }
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Lineage(cmd) => run_lineage(cmd),
        Command::Parents(cmd) => run_neighbors(cmd, NeighborSide::Parents),
        Command::Children(cmd) => run_neighbors(cmd, NeighborSide::Children),
        Command::SnapshotInfo(cmd) => run_snapshot_info(cmd),
    }
}

fn run_lineage(args: LineageArgs) -> Result<()> {
    let kind: EntityKind = args.kind.into();

    let graph = if let Some(path) = &args.remote_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read remote lineage file {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse remote lineage file {}", path.display()))?;
        merge_remote_lineage(&value, &args.id, kind)?
    } else {
        let path = args
            .snapshot
            .as_ref()
            .context("--snapshot is required without --remote-file")?;
        let store = SnapshotStore::load(path)?;
        let opts = BuildOptions {
            traverse_up: !args.no_up,
            traverse_down: !args.no_down,
            max_depth: args.depth,
            max_nodes: args.max_nodes,
        };
        build_graph(&store, &args.id, kind, opts)?
    };

    let result = compute_traversal(&graph);
    let filter = kind_filter(&args.entities);

    let output_str = match args.format {
        OutputFormat::Table => output::format_summary(&graph, &result, args.output.is_none()),
        OutputFormat::Text => render_filtered(&graph, &result, RenderFormat::Text, &filter),
        OutputFormat::Mermaid => render_filtered(&graph, &result, RenderFormat::Mermaid, &filter),
        OutputFormat::Json => {
            lineascope_core::render::json::render(&graph, &result, &filter, args.compact)
        }
    };

    write_output(&args.output, &output_str)?;

    if !args.quiet && !result.complete {
        warn("lineage is incomplete (truncated or partially unresolved)");
    }

    Ok(())
}

#[derive(Clone, Copy)]
enum NeighborSide {
    Parents,
    Children,
}

fn run_neighbors(args: NeighborArgs, side: NeighborSide) -> Result<()> {
    if !matches!(args.format, OutputFormat::Table | OutputFormat::Json) {
        anyhow::bail!("parents/children only support 'table' and 'json' output formats");
    }

    let kind: EntityKind = args.kind.into();
    let store = SnapshotStore::load(&args.snapshot)?;

    // Depth 2 so the one-hop neighbors themselves get resolved; the stubs
    // recorded beyond them never show up in a single-hop listing.
    let opts = BuildOptions {
        traverse_up: matches!(side, NeighborSide::Parents),
        traverse_down: matches!(side, NeighborSide::Children),
        max_depth: 2,
        max_nodes: 500,
    };
    let graph = build_graph(&store, &args.id, kind, opts)?;

    let neighbors = match side {
        NeighborSide::Parents => direct_parents(&graph, &args.id),
        NeighborSide::Children => direct_children(&graph, &args.id),
    };

    let output_str = match args.format {
        OutputFormat::Json => output::format_neighbors_json(&neighbors, args.compact),
        _ => {
            let relation = match side {
                NeighborSide::Parents => "Parents",
                NeighborSide::Children => "Children",
            };
            output::format_neighbors(&format!("{relation} of {kind} ({}):", args.id), &neighbors)
        }
    };

    write_output(&args.output, &output_str)
}

fn run_snapshot_info(args: SnapshotInfoArgs) -> Result<()> {
    let store = SnapshotStore::load(&args.snapshot)?;
    let (datasets, dataflows, cards) = store.counts();

    let mut out = String::new();
    use std::fmt::Write as _;
    writeln!(out, "Snapshot: {}", args.snapshot.display()).unwrap();
    match store.generated_at() {
        Some(at) => writeln!(out, "Generated: {}", at.to_rfc3339()).unwrap(),
        None => writeln!(out, "Generated: unknown").unwrap(),
    }
    writeln!(out, "Datasets:  {datasets}").unwrap();
    writeln!(out, "Dataflows: {dataflows}").unwrap();
    writeln!(out, "Cards:     {cards}").unwrap();

    write_output(&None, &out)
}

/// Runs the async graph build on a dedicated runtime.
fn build_graph(
    store: &SnapshotStore,
    id: &str,
    kind: EntityKind,
    opts: BuildOptions,
) -> Result<LineageGraph> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let graph = runtime.block_on(GraphBuilder::new(store).build(id, kind, opts))?;
    Ok(graph)
}

fn kind_filter(entities: &[KindArg]) -> KindFilter {
    if entities.is_empty() {
        KindFilter::all()
    } else {
        KindFilter::only(entities.iter().map(|k| EntityKind::from(*k)))
    }
}

fn warn(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{} {message}", "lineascope: warning:".yellow());
    } else {
        eprintln!("lineascope: warning: {message}");
    }
}

fn write_output(path: &Option<std::path::PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
