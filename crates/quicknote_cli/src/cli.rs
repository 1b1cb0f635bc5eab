//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quicknote", version, about = "Single-collection note store", long_about = None)]
pub struct Cli {
    /// Store connection string: sqlite://<path>, sqlite::memory:, or a path.
    /// Falls back to QUICKNOTE_DB_URL, then a file in the temp directory.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create a note
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Comma-separated, e.g. "work,ideas"
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// List notes, most recently updated first
    List {
        /// Case-insensitive text matched against title, content and tags
        #[arg(long)]
        search: Option<String>,
        /// Exact single tag
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Search notes by text
    Search {
        text: String,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Show one note
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Update a note; omitted fields keep their current value
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Comma-separated; pass "" to clear
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a note
    Delete { id: String },
    /// List tags in use
    Tags,
    /// Show store status
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Remove every note permanently
    DropAll {
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
    /// Interactive mode selector (default)
    Menu,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["quicknote"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn global_db_flag_parses_after_subcommand() {
        let cli =
            Cli::try_parse_from(["quicknote", "list", "--tag", "work", "--db", "sqlite::memory:"])
                .unwrap();
        assert_eq!(cli.db.as_deref(), Some("sqlite::memory:"));
        assert_eq!(
            cli.command,
            Some(Command::List {
                search: None,
                tag: Some("work".to_string()),
                limit: None,
                json: false,
            })
        );
    }

    #[test]
    fn drop_all_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["quicknote", "drop-all"]).unwrap();
        assert_eq!(cli.command, Some(Command::DropAll { yes: false }));
    }
}
