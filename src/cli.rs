//! CLI module - Command-line interface definitions and handlers

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::{
    Limits, DEFAULT_MAX_CHILDREN, DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_LINES,
};
use crate::core::render::{OutputFormat, Renderer};
use crate::session::serve::{run_serve, SessionHost};
use crate::session::Session;

/// repolens - a bounded, ignore-aware view of a code repository.
#[derive(Parser, Debug)]
#[command(name = "repolens")]
#[command(
    author,
    version,
    about,
    long_about = r#"repolens shows the structure of a repository and reads its files within
fixed limits, so the output stays small enough to hand to an AI agent.

Paths matched by .gitignore (plus .git, __pycache__ and node_modules) are
hidden everywhere. Symbolic links are never followed.

Examples:
    repolens --root /work/project info
    repolens --root /work/project tree
    repolens --root /work/project tree src --depth 5
    repolens --root /work/project read README.md
    repolens serve
"#
)]
pub struct Cli {
    /// Repository root (absolute, or relative to the current directory).
    #[arg(
        long,
        global = true,
        value_name = "ROOT",
        long_help = "Repository root for all operations (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root, and paths given to\n\
tree/read are interpreted relative to it. For `serve`, the session starts\n\
uninitialized unless ROOT is given."
    )]
    pub root: Option<PathBuf>,

    /// Output format (text/json).
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- text (default): indented outline / descriptive text block\n\
- json: pretty-printed JSON objects"
    )]
    pub format: String,

    /// Default maximum tree depth.
    #[arg(
        long,
        global = true,
        env = "REPOLENS_MAX_DEPTH",
        default_value_t = DEFAULT_MAX_DEPTH,
        value_name = "N"
    )]
    pub max_depth: usize,

    /// Maximum expanded entries per directory.
    #[arg(
        long,
        global = true,
        env = "REPOLENS_MAX_CHILDREN",
        default_value_t = DEFAULT_MAX_CHILDREN,
        value_name = "N",
        long_help = "Maximum number of entries expanded per directory. Remaining entries\n\
are counted into the directory's summary instead of being listed."
    )]
    pub max_children: usize,

    /// Maximum size of a readable file in bytes.
    #[arg(
        long,
        global = true,
        env = "REPOLENS_MAX_FILE_SIZE",
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        value_name = "BYTES"
    )]
    pub max_file_size: u64,

    /// Maximum number of lines returned by read.
    #[arg(
        long,
        global = true,
        env = "REPOLENS_MAX_LINES",
        default_value_t = DEFAULT_MAX_LINES,
        value_name = "N"
    )]
    pub max_lines: usize,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr, including every skipped entry.\n\
RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the repository root and whether it has an ignore file.
    Info,

    /// Show the bounded directory tree.
    #[command(
        long_about = "Print the directory tree under ROOT (or SUB_PATH) as an indented outline.\n\n\
Directories at the depth limit are summarized as file/directory counts and total\n\
size. Directories with more entries than --max-children list the first entries\n\
and summarize the rest.\n\n\
Examples:\n\
  repolens tree\n\
  repolens tree src --depth 5\n"
    )]
    Tree {
        /// Subdirectory relative to ROOT.
        #[arg(value_name = "SUB_PATH")]
        sub_path: Option<String>,

        /// Maximum depth for this call (overrides --max-depth).
        #[arg(long, value_name = "N")]
        depth: Option<usize>,
    },

    /// Read a file within the size and line limits.
    #[command(
        long_about = "Read a text file relative to ROOT and print its language, size, line count\n\
and content. Files over --max-file-size, binary files, symbolic links and ignored\n\
paths are refused with a descriptive message.\n\n\
Example:\n\
  repolens read src/main.rs\n"
    )]
    Read {
        /// File path relative to ROOT.
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Answer commands read line by line from stdin.
    #[command(
        long_about = "Start a line-oriented session on stdin/stdout. Each line is one command\n\
(init PATH, info, tree [SUB_PATH] [DEPTH], read FILE, help, quit) and each\n\
response is followed by a blank line."
    )]
    Serve,
}

impl Cli {
    pub fn limits(&self) -> Limits {
        Limits {
            max_depth: self.max_depth,
            max_children: self.max_children,
            max_file_size: self.max_file_size,
            max_lines: self.max_lines,
        }
    }

    /// Default log filter derived from the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Resolve `--root` (default: current directory) and initialize a session on it
fn open_session(root: Option<&Path>, limits: Limits) -> Result<Session> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let root = match root {
        Some(root) if root.is_absolute() => root.to_path_buf(),
        Some(root) => cwd.join(root),
        None => cwd,
    };
    // Missing roots keep their absolute form so initialize reports them
    let root = root.canonicalize().unwrap_or(root);
    Session::initialize(&root.to_string_lossy(), limits)
        .with_context(|| format!("Error initializing code repository at {}", root.display()))
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().map_err(|e: String| anyhow!(e))?;
    let renderer = Renderer::new(format);
    let limits = cli.limits();
    let root = cli.root.as_deref();

    let output = match cli.command {
        Commands::Serve => {
            let session = root.map(|r| open_session(Some(r), limits)).transpose()?;
            let mut host = SessionHost::new(session, limits, format);
            return run_serve(&mut host, io::stdin().lock(), io::stdout().lock());
        }
        Commands::Info => open_session(root, limits)?.get_repo_info(&renderer),
        Commands::Tree { sub_path, depth } => {
            open_session(root, limits)?.get_structure(&renderer, sub_path.as_deref(), depth)
        }
        Commands::Read { file } => open_session(root, limits)?.read_file(&renderer, &file),
    };

    println!("{}", output);
    Ok(())
}
