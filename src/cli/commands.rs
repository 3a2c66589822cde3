use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "glassy-notes")]
#[command(version, about = "A translucent sticky-notes panel")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the store database (defaults to .glassy/store.db in the project root)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes in display order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a new note
    Add {
        /// Initial text (empty if omitted)
        text: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the text of a note
    Edit {
        /// Note ID (position like "2" or id prefix like "3f2a")
        id: String,

        /// New text
        text: String,
    },

    /// Delete a note
    Delete {
        /// Note ID (position or id prefix)
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Move a note to the position of another note
    Move {
        /// Note to move
        id: String,

        /// Note whose position it takes
        target: String,
    },

    /// Show or set the background opacity (0 to 0.9)
    Opacity {
        /// New opacity
        value: Option<String>,
    },

    /// Run an interactive session that keeps undo history and gesture state
    Session,

    /// Start the MCP server on stdio
    Serve,
}
