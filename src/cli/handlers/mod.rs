mod init;
pub use init::cmd_init;

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store;
use crate::model::config::ArborConfig;
use crate::model::node::{DropEvent, DropTarget, Node};
use crate::ops::build::build_tree;
use crate::ops::check::{self, CheckResult};
use crate::ops::reparent::{ReparentOutcome, reparent_strict};
use crate::session::Session;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let dir = resolve_dir(cli.dir.as_deref())?;

    match cli.command {
        Commands::Init(args) => cmd_init(args, &dir),
        Commands::Tree => cmd_tree(&dir, json),
        Commands::List => cmd_list(&dir, json),
        Commands::Mv(args) => cmd_mv(args, &dir, json),
        Commands::Replay(args) => cmd_replay(args, &dir, json),
        Commands::Check => cmd_check(&dir, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(std::env::current_dir()?),
    }
}

struct Workspace {
    config: ArborConfig,
    nodes_path: PathBuf,
    nodes: Vec<Node>,
}

fn load_workspace(dir: &Path) -> Result<Workspace, Box<dyn std::error::Error>> {
    let config = config_io::read_config(dir)?;
    let nodes_path = config_io::store_path(dir, &config);
    let nodes = store::load_nodes(&nodes_path)?;
    Ok(Workspace {
        config,
        nodes_path,
        nodes,
    })
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_tree(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = load_workspace(dir)?;
    let tree = build_tree(&ws.nodes);
    if json {
        check_json_depth(&tree)?;
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", format_tree(&tree, &ws.config.display));
    }
    Ok(())
}

fn cmd_list(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = load_workspace(dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ws.nodes)?);
    } else {
        print!("{}", format_flat(&ws.nodes));
    }
    Ok(())
}

fn cmd_check(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = load_workspace(dir)?;
    let result = check::check_nodes(&ws.nodes);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_check(&result);
    }

    if !result.valid {
        return Err(format!("{} error(s) found", result.errors.len()).into());
    }
    Ok(())
}

fn print_check(result: &CheckResult) {
    if !result.errors.is_empty() {
        println!("Errors:");
        for err in &result.errors {
            println!("  {}", err);
        }
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            println!();
        }
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  {}", warn);
        }
    }
    if result.errors.is_empty() && result.warnings.is_empty() {
        println!("OK");
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_mv(args: MvArgs, dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = load_workspace(dir)?;
    let target = if args.root {
        DropTarget::Root
    } else {
        DropTarget::from(args.target)
    };
    let strict = args.strict || ws.config.reparent.strict;

    let outcome = reparent_strict(&ws.nodes, &args.dragged, &target);
    let rejection = outcome.rejection();
    if let ReparentOutcome::Applied(nodes) = outcome {
        store::save_nodes(&ws.nodes_path, &nodes)?;
    }

    if json {
        let out = MoveJson {
            dragged: args.dragged.clone(),
            target: target.as_id().map(str::to_string),
            applied: rejection.is_none(),
            rejection,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_move(&args.dragged, target.as_id(), rejection));
    }

    match rejection {
        Some(reason) if strict => Err(format!("drop rejected: {}", reason).into()),
        _ => Ok(()),
    }
}

fn cmd_replay(args: ReplayArgs, dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = load_workspace(dir)?;
    let events = read_events(Path::new(&args.events))?;
    let strict = args.strict || ws.config.reparent.strict;

    let mut session = Session::new(ws.nodes);
    let mut moves = Vec::with_capacity(events.len());
    for (i, event) in events.iter().enumerate() {
        let result = session.apply(event);
        if let (Err(reason), true) = (result, strict) {
            return Err(format!("event {}: drop rejected: {}", i + 1, reason).into());
        }
        moves.push(MoveJson {
            dragged: event.dragged.clone(),
            target: event.target.as_id().map(str::to_string),
            applied: result.is_ok(),
            rejection: result.err(),
        });
    }

    if json {
        check_json_depth(session.tree())?;
    }
    store::save_nodes(&ws.nodes_path, session.nodes())?;

    if json {
        let out = ReplayJson {
            moves,
            tree: session.tree().to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for m in &moves {
            println!("{}", format_move(&m.dragged, m.target.as_deref(), m.rejection));
        }
        println!();
        print!("{}", format_tree(session.tree(), &ws.config.display));
    }
    Ok(())
}

/// Parse a JSON-lines events file. Blank lines and `#` comments are skipped.
fn read_events(path: &Path) -> Result<Vec<DropEvent>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
    let mut events = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: DropEvent = serde_json::from_str(line)
            .map_err(|e| format!("{}:{}: invalid drop event: {}", path.display(), n + 1, e))?;
        events.push(event);
    }
    Ok(events)
}
