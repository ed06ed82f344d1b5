use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use scene_graph::{NodeId, Shape};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::actions::Action;
use crate::settings::EditorSettings;
use crate::state::State;
use crate::store::Store;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Edit graph documents from the command line"
)]
pub struct Cli {
    /// JSON file with editor settings
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write an empty graph document
    New { file: PathBuf },
    /// Print the nodes and edges of a document
    Inspect { file: PathBuf },
    /// List nodes and edges whose label contains QUERY
    Search { file: PathBuf, query: String },
    /// Add a node and save the document
    AddNode {
        file: PathBuf,
        #[arg(long)]
        label: Option<String>,
        /// Position as three comma-separated numbers
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        position: Option<Vec<f32>>,
        #[arg(long)]
        shape: Option<Shape>,
    },
    /// Connect two nodes and save the document
    Connect { file: PathBuf, from: u64, to: u64 },
    /// Remove a node with its edges and save the document
    RemoveNode { file: PathBuf, id: u64 },
    /// Print the document as normalized JSON, or write it to OUTPUT
    Export {
        file: PathBuf,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Entry point used by the `graph-editor` executable.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(cli, &mut stdout.lock())
}

pub fn execute(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let settings = match &cli.settings {
        Some(path) => EditorSettings::load(path).with_context(|| {
            format!("Failed to load settings from {}", path.display())
        })?,
        None => EditorSettings::default(),
    };
    let mut state = State::new(Store::new(settings));

    match cli.command {
        Command::New { file } => {
            save(&mut state, &file)?;
            writeln!(out, "created {}", file.display())?;
        }
        Command::Inspect { file } => {
            load(&mut state, &file)?;
            let graph = state.store.graph();
            writeln!(
                out,
                "{} nodes, {} edges",
                graph.node_count(),
                graph.edge_count()
            )?;
            for node in graph.nodes() {
                let [x, y, z] = node.position;
                writeln!(
                    out,
                    "{}\t{}\t{}\t({x}, {y}, {z})",
                    node.id,
                    node.label,
                    node.shape.name()
                )?;
            }
            for edge in graph.edges() {
                writeln!(
                    out,
                    "{}\t{} -> {}\t{}",
                    edge.id, edge.from, edge.to, edge.label
                )?;
            }
        }
        Command::Search { file, query } => {
            load(&mut state, &file)?;
            state.dispatch(Action::Search {
                query,
                now: Instant::now(),
            });
            state.flush();
            let highlights = state.store.highlights();
            let mut nodes: Vec<_> = highlights.nodes().iter().collect();
            let mut edges: Vec<_> = highlights.edges().iter().collect();
            nodes.sort();
            edges.sort();
            for id in nodes {
                writeln!(out, "{id}")?;
            }
            for id in edges {
                writeln!(out, "{id}")?;
            }
        }
        Command::AddNode {
            file,
            label,
            position,
            shape,
        } => {
            load(&mut state, &file)?;
            let spec = match (label, position, shape) {
                (None, None, None) => None,
                (label, position, shape) => {
                    let ordinal = state.store.graph().node_count() + 1;
                    let mut spec = state.store.settings.nodes.spec(ordinal);
                    if let Some(label) = label {
                        spec.label = label;
                    }
                    match position.as_deref() {
                        Some(&[x, y, z]) => {
                            if ![x, y, z].iter().all(|c| c.is_finite()) {
                                bail!("position must be finite numbers");
                            }
                            spec.position = [x, y, z];
                        }
                        Some(other) => bail!(
                            "position needs three coordinates, got {}",
                            other.len()
                        ),
                        None => {}
                    }
                    if let Some(shape) = shape {
                        spec.shape = shape;
                    }
                    Some(spec)
                }
            };
            let id = state
                .store
                .add_node_from(spec)
                .context("Failed to add node")?;
            save(&mut state, &file)?;
            writeln!(out, "added {id}")?;
        }
        Command::Connect { file, from, to } => {
            load(&mut state, &file)?;
            let edge = state
                .store
                .connect(NodeId(from), NodeId(to))
                .context("Failed to connect nodes")?;
            save(&mut state, &file)?;
            writeln!(out, "added {edge}")?;
        }
        Command::RemoveNode { file, id } => {
            load(&mut state, &file)?;
            let removed = state
                .store
                .remove_node(NodeId(id))
                .context("Failed to remove node")?;
            save(&mut state, &file)?;
            writeln!(
                out,
                "removed {} and {} edges",
                NodeId(id),
                removed.len()
            )?;
        }
        Command::Export { file, output } => {
            load(&mut state, &file)?;
            match output {
                Some(path) => {
                    save(&mut state, &path)?;
                    writeln!(out, "exported {}", path.display())?;
                }
                None => {
                    let json = state
                        .store
                        .export_json()
                        .context("Failed to serialize graph")?;
                    writeln!(out, "{json}")?;
                }
            }
        }
    }
    Ok(())
}

fn load(state: &mut State, path: &Path) -> anyhow::Result<()> {
    state.dispatch(Action::LoadFromFile {
        path: path.to_path_buf(),
    });
    state.flush();
    check(state)
        .with_context(|| format!("Failed to load {}", path.display()))
}

fn save(state: &mut State, path: &Path) -> anyhow::Result<()> {
    state.dispatch(Action::SaveToFile {
        path: path.to_path_buf(),
    });
    state.flush();
    check(state)
        .with_context(|| format!("Failed to save {}", path.display()))
}

fn check(state: &mut State) -> anyhow::Result<()> {
    match state.store.error_message.take() {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}
