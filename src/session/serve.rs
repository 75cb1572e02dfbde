//! Line-oriented stdio session
//!
//! Reads one command per line and answers with a text block followed by a
//! blank line:
//!
//! ```text
//! init /abs/path/to/repo
//! info
//! tree [SUB_PATH] [DEPTH]
//! read FILE
//! help
//! quit
//! ```

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::core::config::Limits;
use crate::core::error::ErrorPayload;
use crate::core::render::{OutputFormat, Renderer, INIT_ERROR};
use crate::session::Session;

const NOT_INITIALIZED: &str =
    "No code repository has been initialized yet. Please use init first.";

const HELP: &str = "Commands:
  init PATH              initialize the repository at an absolute PATH
  info                   show the initialized repository
  tree [SUB_PATH] [N]    show the structure (use . for the root), N = depth
  read FILE              read a file relative to the repository root
  help                   show this help
  quit                   end the session";

/// A parsed session command
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Init(&'a str),
    Info,
    Tree {
        sub_path: Option<&'a str>,
        depth: Option<usize>,
    },
    Read(&'a str),
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name {
        "init" => Command::Init(rest),
        "info" => Command::Info,
        "tree" => {
            let mut args = rest.split_whitespace();
            let sub_path = args.next();
            let depth = args.next().and_then(|d| d.parse().ok());
            Command::Tree { sub_path, depth }
        }
        "read" => Command::Read(rest),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other),
    }
}

/// Holds the current session; `init` replaces it wholesale
pub struct SessionHost {
    session: Option<Session>,
    limits: Limits,
    renderer: Renderer,
}

impl SessionHost {
    pub fn new(session: Option<Session>, limits: Limits, format: OutputFormat) -> Self {
        Self {
            session,
            limits,
            renderer: Renderer::new(format),
        }
    }

    /// Handle one command line; `None` ends the session
    pub fn handle(&mut self, line: &str) -> Option<String> {
        let command = parse_command(line);
        debug!("Session command: {:?}", command);

        let response = match command {
            Command::Quit => return None,
            Command::Help => self.renderer.message(HELP),
            Command::Init(path) => match Session::initialize(path, self.limits) {
                Ok(session) => {
                    debug!("Session root is now {}", session.root().display());
                    let text = session.describe(&self.renderer);
                    self.session = Some(session);
                    text
                }
                Err(e) => self.renderer.error(INIT_ERROR, &e),
            },
            Command::Unknown(name) => self.renderer.failure(
                None,
                &ErrorPayload::new(
                    "UNKNOWN_COMMAND",
                    format!("Unknown command: {} (try help)", name),
                ),
            ),
            Command::Info => self.with_session(|s, r| s.get_repo_info(r)),
            Command::Tree { sub_path, depth } => {
                self.with_session(|s, r| s.get_structure(r, sub_path, depth))
            }
            Command::Read(path) => self.with_session(|s, r| s.read_file(r, path)),
        };
        Some(response)
    }

    fn with_session(&self, f: impl FnOnce(&Session, &Renderer) -> String) -> String {
        match &self.session {
            Some(session) => f(session, &self.renderer),
            None => self
                .renderer
                .failure(None, &ErrorPayload::new("NOT_INITIALIZED", NOT_INITIALIZED)),
        }
    }
}

/// Run the session loop until `quit` or end of input
pub fn run_serve<R: BufRead, W: Write>(
    host: &mut SessionHost,
    input: R,
    mut output: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match host.handle(&line) {
            Some(response) => {
                writeln!(output, "{}\n", response)?;
                output.flush()?;
            }
            None => break,
        }
    }
    Ok(())
}
