//! Renderer module
//!
//! Renders trees, file reads and errors as plain text outlines or JSON.

use serde::Serialize;

use crate::core::error::{AccessError, ErrorPayload};
use crate::core::model::{FileContent, FileStructure, RepoInfo, Summary};

/// Text-mode prefix for failed structure calls
pub const STRUCTURE_ERROR: &str = "Error analyzing repository structure";

/// Text-mode prefix for failed reads
pub const READ_ERROR: &str = "Error";

/// Text-mode prefix for failed initializations
pub const INIT_ERROR: &str = "Error initializing code repository";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Format a byte count with binary (1024) scaling and one decimal place
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = size as f64;
    let mut index = 0;
    while value >= 1024.0 && index < UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }
    format!("{:.1} {}", value, UNITS[index])
}

fn summary_line(summary: &Summary) -> String {
    format!(
        "{} files, {} directories, {}",
        summary.file_count,
        summary.dir_count,
        format_size(summary.total_size)
    )
}

/// Render a tree as an indented outline, two spaces per level
pub fn format_structure(tree: &FileStructure) -> String {
    let mut lines = Vec::new();
    format_node(tree, 0, &mut lines);
    lines.join("\n")
}

fn format_node(node: &FileStructure, level: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(level);

    if !node.is_dir() {
        lines.push(format!(
            "{}📄 {} ({})",
            indent,
            node.path,
            format_size(node.size.unwrap_or(0))
        ));
        return;
    }

    lines.push(format!("{}📁 {}/", indent, node.path));
    for child in node.children() {
        format_node(child, level + 1, lines);
    }

    match (&node.summary, node.children().is_empty()) {
        (Some(summary), true) => {
            lines.push(format!("{}   Contains: {}", indent, summary_line(summary)));
        }
        (Some(summary), false) => {
            lines.push(format!(
                "{}  ... and {} more files, {} more directories, {}",
                indent,
                summary.file_count,
                summary.dir_count,
                format_size(summary.total_size)
            ));
        }
        (None, _) => {}
    }
}

/// Render a successful read as a descriptive text block
pub fn format_file_content(file: &FileContent) -> String {
    format!(
        "File: {}\nLanguage: {}\nSize: {} bytes\nTotal lines: {}\n\n{}",
        file.path, file.language, file.size, file.lines, file.content
    )
}

pub fn format_repo_info(info: &RepoInfo) -> String {
    format!(
        "Code Repository Information:\nPath: {}\nExists: {}\nIs Directory: {}\n{}",
        info.path,
        info.exists,
        info.is_dir,
        ignore_file_status(info.has_ignore_file)
    )
}

/// Confirmation text for a freshly initialized repository
pub fn format_initialized(info: &RepoInfo) -> String {
    format!(
        "Successfully initialized code repository at: {}\n{}",
        info.path,
        ignore_file_status(info.has_ignore_file)
    )
}

pub fn ignore_file_status(present: bool) -> &'static str {
    if present {
        "Found .gitignore file"
    } else {
        "No .gitignore file present"
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a ErrorPayload,
}

#[derive(Serialize)]
struct MessageEnvelope<'a> {
    message: &'a str,
}

/// Renderer for call results
pub struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn structure(&self, tree: &FileStructure) -> String {
        match self.format {
            OutputFormat::Text => format_structure(tree),
            OutputFormat::Json => to_json(tree),
        }
    }

    pub fn file_content(&self, file: &FileContent) -> String {
        match self.format {
            OutputFormat::Text => format_file_content(file),
            OutputFormat::Json => to_json(file),
        }
    }

    pub fn repo_info(&self, info: &RepoInfo) -> String {
        match self.format {
            OutputFormat::Text => format_repo_info(info),
            OutputFormat::Json => to_json(info),
        }
    }

    pub fn initialized(&self, info: &RepoInfo) -> String {
        match self.format {
            OutputFormat::Text => format_initialized(info),
            OutputFormat::Json => to_json(info),
        }
    }

    /// Plain informational text, wrapped as `{"message": ...}` in JSON mode
    pub fn message(&self, text: &str) -> String {
        match self.format {
            OutputFormat::Text => text.to_string(),
            OutputFormat::Json => to_json(&MessageEnvelope { message: text }),
        }
    }

    /// Render an error; `context` prefixes the message in text mode
    pub fn error(&self, context: &str, err: &AccessError) -> String {
        self.failure(Some(context), &ErrorPayload::from(err))
    }

    /// Render a failure that carries its own code
    pub fn failure(&self, context: Option<&str>, payload: &ErrorPayload) -> String {
        match (self.format, context) {
            (OutputFormat::Text, Some(context)) => format!("{}: {}", context, payload.message),
            (OutputFormat::Text, None) => payload.message.clone(),
            (OutputFormat::Json, _) => to_json(&ErrorEnvelope { error: payload }),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
