//! Structure backend - bounded, ignore-aware directory tree
//!
//! Directory entries are enumerated with walkdir (one level, links not
//! followed). Expansion stops at the depth cap and after the width cap;
//! everything not expanded is counted into the directory's [`Summary`].

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::config::Limits;
use crate::core::error::AccessError;
use crate::core::model::{FileStructure, Summary};
use crate::core::paths::{join_relative, normalize_path, PathGuard};

/// Builds [`FileStructure`] trees under the guard's root
pub struct StructureWalker<'a> {
    guard: &'a PathGuard,
    max_depth: usize,
    max_children: usize,
}

impl<'a> StructureWalker<'a> {
    pub fn new(guard: &'a PathGuard, limits: &Limits) -> Self {
        Self {
            guard,
            max_depth: limits.max_depth,
            max_children: limits.max_children,
        }
    }

    /// Walk `path`, whose root-relative form is `relative` (empty for the
    /// repository root itself).
    ///
    /// Fails when the target escapes the root, is a symbolic link, is
    /// excluded (only checked for a non-empty `relative`), cannot be stat'ed,
    /// or is neither a file nor a directory.
    pub fn walk(
        &self,
        path: &Path,
        relative: &str,
        current_depth: usize,
        max_depth: Option<usize>,
    ) -> Result<FileStructure, AccessError> {
        let max_depth = max_depth.unwrap_or(self.max_depth);
        let display = if relative.is_empty() {
            normalize_path(path)
        } else {
            relative.to_string()
        };

        if !self.guard.is_contained(path) {
            return Err(AccessError::OutsideRoot(display));
        }

        let metadata = fs::symlink_metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AccessError::NotFound(display.clone()),
            _ => AccessError::io(display.clone(), e),
        })?;

        if metadata.file_type().is_symlink() {
            return Err(AccessError::Symlink(display));
        }

        if !relative.is_empty() && self.guard.is_excluded_entry(relative, metadata.is_dir()) {
            return Err(AccessError::Excluded(display));
        }

        let node_path = if relative.is_empty() {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or(display)
        } else {
            display
        };

        if metadata.is_file() {
            return Ok(FileStructure::file(node_path, metadata.len()));
        }

        if metadata.is_dir() {
            return Ok(self.expand(path, node_path, relative, current_depth, max_depth));
        }

        Err(AccessError::UnsupportedType(node_path))
    }

    fn expand(
        &self,
        path: &Path,
        node_path: String,
        relative: &str,
        current_depth: usize,
        max_depth: usize,
    ) -> FileStructure {
        let depth_capped = current_depth >= max_depth;
        let mut children = Vec::new();
        let mut overflow = Summary::default();
        let mut truncated = depth_capped;

        for entry in list_entries(path) {
            let entry_relative = join_relative(relative, &entry.file_name().to_string_lossy());
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                debug!("Skipping symbolic link: {}", entry_relative);
                continue;
            }
            if self
                .guard
                .is_excluded_entry(&entry_relative, file_type.is_dir())
            {
                continue;
            }

            if depth_capped || children.len() >= self.max_children {
                if file_type.is_dir() {
                    overflow.add_dir();
                    truncated = true;
                } else if file_type.is_file() {
                    match entry.metadata() {
                        Ok(metadata) => {
                            overflow.add_file(metadata.len());
                            truncated = true;
                        }
                        Err(e) => warn!("Error processing {}: {}", entry_relative, e),
                    }
                } else {
                    debug!("Skipping special file: {}", entry_relative);
                }
                continue;
            }

            match self.walk(
                entry.path(),
                &entry_relative,
                current_depth + 1,
                Some(max_depth),
            ) {
                Ok(child) => children.push(child),
                Err(e) => warn!("Error processing {}: {}", entry_relative, e),
            }
        }

        if truncated {
            debug!(
                "Summarized {} entries under {}",
                overflow.entries(),
                node_path
            );
        }
        FileStructure::directory(node_path, children, truncated.then_some(overflow))
    }
}

/// Direct entries of `path` in enumeration order. Listing errors are logged
/// and yield no entries.
fn list_entries(path: &Path) -> impl Iterator<Item = DirEntry> + '_ {
    WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Error reading directory {}: {}", path.display(), e);
                None
            }
        })
}
