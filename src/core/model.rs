//! Result model
//!
//! Trees and file reads are built fresh per call and owned by the caller.

use serde::{Deserialize, Serialize};

use crate::core::language::Language;

/// The kind of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
}

/// Aggregate counts for entries that were not expanded into children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub file_count: u64,
    pub dir_count: u64,
    pub total_size: u64,
}

impl Summary {
    pub fn add_file(&mut self, size: u64) {
        self.file_count += 1;
        self.total_size += size;
    }

    pub fn add_dir(&mut self) {
        self.dir_count += 1;
    }

    /// Number of entries this summary stands for
    pub fn entries(&self) -> u64 {
        self.file_count + self.dir_count
    }
}

/// A node of the repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStructure {
    /// Path relative to root, using '/' as separator
    pub path: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Size in bytes (files only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Expanded children (directories only, omitted when empty)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileStructure>>,

    /// Counts for entries beyond the depth or width limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl FileStructure {
    /// Create a file leaf
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            node_type: NodeType::File,
            size: Some(size),
            children: None,
            summary: None,
        }
    }

    /// Create a directory node; an empty child list is stored as `None`
    pub fn directory(
        path: impl Into<String>,
        children: Vec<FileStructure>,
        summary: Option<Summary>,
    ) -> Self {
        Self {
            path: path.into(),
            node_type: NodeType::Directory,
            size: None,
            children: if children.is_empty() {
                None
            } else {
                Some(children)
            },
            summary,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }

    pub fn children(&self) -> &[FileStructure] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Depth of the deepest node below (and including) this one, root = 0
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Successful bounded read of a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// Path as requested, relative to root
    pub path: String,
    pub language: Language,
    /// File size in bytes
    pub size: u64,
    /// Number of lines included in `content`
    pub lines: usize,
    /// Whether lines beyond the limit were omitted
    pub truncated: bool,
    /// Content, including the truncation notice when truncated
    pub content: String,
}

/// Status of the initialized repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub path: String,
    pub exists: bool,
    pub is_dir: bool,
    pub has_ignore_file: bool,
}
