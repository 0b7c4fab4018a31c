use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "snippet-arsenal", version, about = "Personal code-snippet manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Snippet database file
    #[arg(long, global = true, env = "SNIPPET_ARSENAL_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List snippets matching a keyword (all snippets when omitted)
    Search {
        #[arg(num_args = 0..)]
        keyword: Vec<String>,
    },
    /// Show a snippet in full
    Show { id: i64 },
    /// Create a snippet
    Add(FieldArgs),
    /// Replace the given fields of a snippet
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Permanently delete a snippet
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Copy a snippet's code to the clipboard
    Copy { id: i64 },
}

#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long, value_parser = ["draft", "tested", "prod"])]
    pub status: Option<String>,
    #[arg(long, conflicts_with = "code_file")]
    pub code: Option<String>,
    /// Read code from a file, `-` for stdin
    #[arg(long, value_name = "PATH")]
    pub code_file: Option<PathBuf>,
    #[arg(long)]
    pub notes: Option<String>,
}
