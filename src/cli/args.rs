//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Flashcard organizer: directories and card decks with a flip-card viewer
#[derive(Parser, Debug)]
#[command(name = "cardtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: $XDG_CONFIG_HOME/cardtree/cardtree.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Seed the tree from a JSON snapshot
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub seed_file: Option<PathBuf>,

    /// Start with an empty root directory instead of the sample tree
    #[arg(long, global = true, conflicts_with = "seed_file")]
    pub empty: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the tree
    List {
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
        /// Show node ids
        #[arg(long)]
        ids: bool,
    },

    /// Add a directory or card deck under a target
    Add {
        /// Target id (`root` for the root directory); a deck target adds next to the deck
        target: String,
        /// Node type: `directory` or `cards`
        file_type: String,
        /// Name of the new node
        name: String,
        /// Write the resulting tree to a snapshot file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Remove a node and everything below it
    Remove {
        /// Node id
        id: String,
        /// Write the resulting tree to a snapshot file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show a node and its parent
    Find {
        /// Node id
        id: String,
    },

    /// Study a card deck (flip-card viewer)
    Study {
        /// Deck id
        deck: String,
    },

    /// Interactive session against one in-memory tree
    Shell,

    /// Answer JSON requests on stdin, one per line
    Serve,

    /// Write the tree to a JSON snapshot
    Export {
        /// Target file
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Print the global config file location
    Path,
}
