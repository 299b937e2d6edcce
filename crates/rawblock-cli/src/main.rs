//! Rawblock knowledge graph CLI.
//!
//! Provides the `rawblock` binary for checking authored content and querying
//! the validated graph, learning paths, and security registries, plus a
//! file-backed driver for the learning progress reducer.
//!
//! Results are printed as JSON to stdout; diagnostics and logs go to stderr.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use rawblock_graph::{ContentError, KnowledgeBase, Severity, VulnerabilityFilter};
use rawblock_progress::{LearningProgressAction, LearningProgressState, ProgressModel};

const EXIT_OK: i32 = 0;
const EXIT_LOOKUP: i32 = 1;
const EXIT_INTEGRITY: i32 = 2;
const EXIT_IO: i32 = 3;

/// Bitcoin knowledge graph and learning progress tools.
#[derive(Parser)]
#[command(
    name = "rawblock",
    about = "Bitcoin knowledge graph and learning progress tools"
)]
struct Cli {
    /// Path to the JSON content bundle.
    #[arg(
        long,
        global = true,
        env = "RAWBLOCK_CONTENT",
        default_value = "content.json"
    )]
    content: PathBuf,

    /// Path to the persisted learning progress blob.
    #[arg(
        long,
        global = true,
        env = "RAWBLOCK_PROGRESS",
        default_value = "progress.json"
    )]
    state: PathBuf,

    /// Number of guided lessons used to clamp lesson indices.
    #[arg(long, global = true, env = "RAWBLOCK_LESSON_COUNT")]
    lesson_count: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build and validate the content bundle, including every learning path.
    Check,

    /// Show a node with the registry entries that reference it.
    Node {
        /// Node id.
        id: String,
    },

    /// Show a node's incoming and outgoing edges and its neighbors.
    Neighbors {
        /// Node id.
        id: String,
    },

    /// Show a node's DEPENDS_ON prerequisites and which are still missing.
    Prereqs {
        /// Node id.
        id: String,

        /// Comma-separated ids of nodes already completed.
        #[arg(long, value_delimiter = ',')]
        completed: Vec<String>,
    },

    /// Show progress at a step of a learning path (default: canonical path).
    Path {
        /// Path id.
        id: Option<String>,

        /// Current step index; clamped into the path.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        step: i64,
    },

    /// Resolve an attack model against the graph.
    Attack {
        /// Attack model id.
        id: String,
    },

    /// List vulnerabilities matching every given filter.
    Vulns {
        /// critical, high or medium.
        #[arg(long, value_parser = parse_severity)]
        severity: Option<Severity>,

        #[arg(long)]
        year: Option<u16>,

        /// Exact affected version.
        #[arg(long)]
        version: Option<String>,
    },

    /// Read or update the persisted learning progress.
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },
}

#[derive(Subcommand)]
enum ProgressCommands {
    /// Print the sanitized progress state.
    Show,

    /// Apply one action and write the resulting state back.
    Apply {
        /// Action as JSON, e.g. '{"type": "MARK_NODE_COMPLETE", "nodeId": "utxo"}'.
        action: String,
    },
}

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let model = cli
        .lesson_count
        .map_or_else(ProgressModel::default, ProgressModel::new);

    let exit_code = match cli.command {
        Commands::Check => run_check(&cli.content),
        Commands::Node { id } => with_content(&cli.content, |kb| run_node(kb, &id)),
        Commands::Neighbors { id } => with_content(&cli.content, |kb| run_neighbors(kb, &id)),
        Commands::Prereqs { id, completed } => {
            with_content(&cli.content, |kb| run_prereqs(kb, &id, &completed))
        }
        Commands::Path { id, step } => {
            with_content(&cli.content, |kb| run_path(kb, id.as_deref(), step))
        }
        Commands::Attack { id } => with_content(&cli.content, |kb| run_attack(kb, &id)),
        Commands::Vulns {
            severity,
            year,
            version,
        } => {
            let filter = VulnerabilityFilter {
                severity,
                year,
                affected_version: version,
            };
            with_content(&cli.content, |kb| run_vulns(kb, &filter))
        }
        Commands::Progress { command } => match command {
            ProgressCommands::Show => run_progress_show(&model, &cli.state),
            ProgressCommands::Apply { action } => run_progress_apply(&model, &cli.state, &action),
        },
    };
    process::exit(exit_code);
}

/// Parse a severity name as it appears in content.
fn parse_severity(s: &str) -> Result<Severity, String> {
    serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
        .map_err(|_| format!("invalid severity '{}', expected critical/high/medium", s))
}

/// Exit code for a content load failure.
fn content_exit_code(err: &ContentError) -> i32 {
    match err {
        ContentError::Integrity(_) | ContentError::DuplicatePathId { .. } => EXIT_INTEGRITY,
        ContentError::Decode(_) | ContentError::Io { .. } => EXIT_IO,
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize result: {}", e),
    }
}

fn load(content: &Path) -> Result<KnowledgeBase, i32> {
    match KnowledgeBase::from_path(content) {
        Ok(kb) => {
            tracing::info!(
                content = %content.display(),
                nodes = kb.store().node_count(),
                edges = kb.store().edge_count(),
                paths = kb.all_paths().len(),
                "content loaded"
            );
            Ok(kb)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(content_exit_code(&e))
        }
    }
}

/// Load content, then run `f` against it.
fn with_content(content: &Path, f: impl FnOnce(&KnowledgeBase) -> i32) -> i32 {
    match load(content) {
        Ok(kb) => f(&kb),
        Err(code) => code,
    }
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 = content valid, 2 = integrity failure or a path
/// referencing unknown nodes, 3 = I/O or decode error.
fn run_check(content: &Path) -> i32 {
    let kb = match load(content) {
        Ok(kb) => kb,
        Err(code) => return code,
    };

    let invalid_paths: Vec<_> = kb
        .all_paths()
        .iter()
        .filter_map(|path| {
            let validation = kb.validate_path(path);
            (!validation.valid).then(|| {
                json!({
                    "pathId": path.id,
                    "missingNodeIds": validation.missing_node_ids,
                })
            })
        })
        .collect();

    let registry = kb.registry();
    print_json(&json!({
        "valid": invalid_paths.is_empty(),
        "nodes": kb.store().node_count(),
        "edges": kb.store().edge_count(),
        "assumptions": registry.assumptions().len(),
        "attackModels": registry.attack_models().len(),
        "vulnerabilities": registry.vulnerabilities().len(),
        "validationRules": registry.validation_rules().len(),
        "paths": kb.all_paths().len(),
        "canonicalPathId": kb.canonical_path().map(|p| p.id.as_str()),
        "invalidPaths": invalid_paths,
    }));

    if invalid_paths.is_empty() {
        EXIT_OK
    } else {
        eprintln!(
            "{} learning path(s) reference unknown nodes",
            invalid_paths.len()
        );
        EXIT_INTEGRITY
    }
}

fn run_node(kb: &KnowledgeBase, id: &str) -> i32 {
    let Some(node) = kb.store().get_node(id) else {
        eprintln!("Error: no node with id '{}'", id);
        return EXIT_LOOKUP;
    };
    let registry = kb.registry();
    print_json(&json!({
        "node": node,
        "assumptions": registry.assumptions_for_node(id),
        "attackModels": registry.attack_models_for_node(id),
        "vulnerabilities": registry.vulnerabilities_for_node(id),
        "validationRules": registry.validation_rules_for_node(id),
    }));
    EXIT_OK
}

fn run_neighbors(kb: &KnowledgeBase, id: &str) -> i32 {
    let store = kb.store();
    if !store.has_node(id) {
        eprintln!("Error: no node with id '{}'", id);
        return EXIT_LOOKUP;
    }
    print_json(&json!({
        "outgoing": store.get_outgoing_edges(id),
        "incoming": store.get_incoming_edges(id),
        "neighbors": store
            .get_neighbors(id)
            .into_iter()
            .map(|n| n.id.as_str())
            .collect::<Vec<_>>(),
    }));
    EXIT_OK
}

fn run_prereqs(kb: &KnowledgeBase, id: &str, completed: &[String]) -> i32 {
    if !kb.store().has_node(id) {
        eprintln!("Error: no node with id '{}'", id);
        return EXIT_LOOKUP;
    }
    let missing = kb.missing_prerequisites(id, completed);
    print_json(&json!({
        "nodeId": id,
        "prerequisites": kb.node_prerequisites(id),
        "missing": missing,
        "unlocked": missing.is_empty(),
    }));
    EXIT_OK
}

fn run_path(kb: &KnowledgeBase, id: Option<&str>, step: i64) -> i32 {
    let path = match id {
        Some(id) => kb.path_by_id(id),
        None => kb.canonical_path(),
    };
    let Some(path) = path else {
        match id {
            Some(id) => eprintln!("Error: no learning path with id '{}'", id),
            None => eprintln!("Error: content defines no learning paths"),
        }
        return EXIT_LOOKUP;
    };
    print_json(&json!({
        "path": path,
        "progress": kb.path_progress(path, step),
        "validation": kb.validate_path(path),
    }));
    EXIT_OK
}

fn run_attack(kb: &KnowledgeBase, id: &str) -> i32 {
    match kb.attack_traversal(id) {
        Some(traversal) => {
            print_json(&traversal);
            EXIT_OK
        }
        None => {
            eprintln!("Error: no attack model with id '{}'", id);
            EXIT_LOOKUP
        }
    }
}

fn run_vulns(kb: &KnowledgeBase, filter: &VulnerabilityFilter) -> i32 {
    print_json(&kb.registry().filter_vulnerabilities(filter));
    EXIT_OK
}

/// Read the persisted blob. A missing file is an empty blob.
fn read_state(model: &ProgressModel, path: &Path) -> Result<LearningProgressState, i32> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(model.parse_state(&raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(state = %path.display(), "no persisted progress, starting fresh");
            Ok(LearningProgressState::default())
        }
        Err(e) => {
            eprintln!(
                "Error: failed to read progress from '{}': {}",
                path.display(), e
            );
            Err(EXIT_IO)
        }
    }
}

fn print_state(model: &ProgressModel, state: &LearningProgressState) {
    print_json(&json!({
        "state": state,
        "lessonUnlockIndex": model.lesson_unlock_index(&state.completed_lessons),
    }));
}

fn run_progress_show(model: &ProgressModel, path: &Path) -> i32 {
    match read_state(model, path) {
        Ok(state) => {
            print_state(model, &state);
            EXIT_OK
        }
        Err(code) => code,
    }
}

/// Execute the progress apply subcommand.
///
/// Returns exit code: 0 = state written, 1 = malformed action,
/// 3 = I/O or serialization error.
fn run_progress_apply(model: &ProgressModel, path: &Path, action: &str) -> i32 {
    let action: LearningProgressAction = match serde_json::from_str(action) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: invalid action: {}", e);
            return EXIT_LOOKUP;
        }
    };

    let state = match read_state(model, path) {
        Ok(state) => state,
        Err(code) => return code,
    };
    let next = model.reduce(state, action);

    let blob = match model.serialize_state(&next) {
        Ok(blob) => blob,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_IO;
        }
    };
    if let Err(e) = fs::write(path, blob) {
        eprintln!(
            "Error: failed to write progress to '{}': {}",
            path.display(), e
        );
        return EXIT_IO;
    }

    print_state(model, &next);
    EXIT_OK
}
