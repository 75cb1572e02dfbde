//! Traversal and read limits

use serde::{Deserialize, Serialize};

/// Default maximum traversal depth (root = 0)
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Default maximum number of expanded children per directory
pub const DEFAULT_MAX_CHILDREN: usize = 100;

/// Default maximum file size for reads in bytes (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Default maximum number of lines returned by a read
pub const DEFAULT_MAX_LINES: usize = 1000;

/// Limits applied by the structure walker and the file reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Directories at this depth are summarized instead of expanded
    pub max_depth: usize,

    /// Width cap: entries beyond this count are folded into a summary
    pub max_children: usize,

    /// Files larger than this are refused (bytes)
    pub max_file_size: u64,

    /// Reads stop after this many lines and append a truncation notice
    pub max_lines: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_children: DEFAULT_MAX_CHILDREN,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}
