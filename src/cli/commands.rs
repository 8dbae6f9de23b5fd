use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arbor", about = concat!("arbor v", env!("CARGO_PKG_VERSION"), " - drag nodes around a tree"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different directory (where arbor.toml lives)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write arbor.toml and a demo node list
    Init(InitArgs),
    /// Show the nested tree
    Tree,
    /// Show the flat node list
    List,
    /// Drop a node onto another node, or onto the root
    Mv(MvArgs),
    /// Apply a file of drop events (one JSON object per line)
    Replay(ReplayArgs),
    /// Validate the node list
    Check,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct MvArgs {
    /// Node being dragged
    pub dragged: String,
    /// Node it is dropped on
    #[arg(required_unless_present = "root", conflicts_with = "root")]
    pub target: Option<String>,
    /// Drop on the root container (detach)
    #[arg(long)]
    pub root: bool,
    /// Fail when the drop is rejected
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Events file, e.g. `{"dragged":"2","target":"1"}` per line
    pub events: String,
    /// Fail on the first rejected drop (nothing is saved)
    #[arg(long)]
    pub strict: bool,
}
