//! Command-line argument definitions for the Pagetree CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global options select the configuration file, the storage
//! directory and logging verbosity; the [`Action`] subcommand is one user
//! interaction with the editor.

use clap::{Parser, Subcommand};

use pagetree::options::LayoutDirection;

/// Command-line arguments for the Pagetree editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the saved document
    #[arg(long, global = true)]
    pub storage_dir: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub action: Action,
}

/// One editor interaction.
#[derive(Subcommand, Debug, Clone)]
pub enum Action {
    /// Print the page tree with positions
    Show {
        /// Print the diagram nodes and edges as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute every position
    ResetLayout {
        /// Layout direction (tb, lr)
        #[arg(short, long)]
        direction: Option<LayoutDirection>,
    },

    /// Move a page to a new position
    #[command(allow_negative_numbers = true)]
    Move { id: String, x: f64, y: f64 },

    /// Move a home section to where another one is
    ReorderSection { active: String, over: Option<String> },

    /// Move a page to where another one is in the page list
    ReorderPage { active: String, over: Option<String> },

    /// Move a page under another parent; omit the parent to make it a root
    Reparent { id: String, parent: Option<String> },

    /// Replay a JSON file of editor events
    Apply { script: String },

    /// Write the document as a JSON download
    Export {
        /// Directory the file is written to
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Report structural problems in the saved document
    Check,

    /// Delete the saved document
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_with_negative_coordinates() {
        let args = Args::parse_from(["pagetree", "move", "blog", "-10.5", "20"]);
        match args.action {
            Action::Move { id, x, y } => {
                assert_eq!(id, "blog");
                assert_eq!(x, -10.5);
                assert_eq!(y, 20.0);
            }
            other => panic!("Unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let args = Args::parse_from([
            "pagetree",
            "reset-layout",
            "--direction",
            "lr",
            "--storage-dir",
            "/tmp/store",
            "--log-level",
            "off",
        ]);
        assert!(matches!(
            args.action,
            Action::ResetLayout {
                direction: Some(LayoutDirection::LeftToRight)
            }
        ));
        assert_eq!(args.storage_dir.as_deref(), Some("/tmp/store"));
        assert_eq!(args.log_level, "off");
    }

    #[test]
    fn test_optional_drop_target() {
        let args = Args::parse_from(["pagetree", "reorder-section", "CTA"]);
        assert!(matches!(
            args.action,
            Action::ReorderSection { ref active, over: None } if active == "CTA"
        ));
    }
}
