//! Session - the initialized repository context
//!
//! A [`Session`] owns the canonical root, its [`PathGuard`] and the limits.
//! It is created by [`Session::initialize`] and never mutated afterwards;
//! re-initialization builds a new one.

pub mod serve;

use std::path::{Path, PathBuf};
use tracing::info;

use crate::backends::reader::BoundedFileReader;
use crate::backends::structure::StructureWalker;
use crate::core::config::Limits;
use crate::core::error::AccessError;
use crate::core::model::{FileContent, FileStructure, RepoInfo};
use crate::core::paths::{normalize_path, PathGuard};
use crate::core::render::{Renderer, READ_ERROR, STRUCTURE_ERROR};

#[derive(Debug, Clone)]
pub struct Session {
    root: PathBuf,
    guard: PathGuard,
    limits: Limits,
}

impl Session {
    /// Validate `root` and build the exclusion ruleset.
    ///
    /// The root must be an absolute path to an existing directory; empty,
    /// `.` and `./` are rejected as ambiguous.
    pub fn initialize(root: &str, limits: Limits) -> Result<Self, AccessError> {
        let trimmed = root.trim();
        if trimmed.is_empty() || trimmed == "." || trimmed == "./" {
            return Err(AccessError::AmbiguousRoot);
        }

        let path = Path::new(trimmed);
        if !path.is_absolute() {
            return Err(AccessError::RelativeRoot(trimmed.to_string()));
        }
        if !path.exists() {
            return Err(AccessError::MissingRoot(trimmed.to_string()));
        }
        if !path.is_dir() {
            return Err(AccessError::RootNotDirectory(trimmed.to_string()));
        }

        let root = path
            .canonicalize()
            .map_err(|e| AccessError::io(trimmed, e))?;
        let guard = PathGuard::new(&root);
        info!(
            "Initialized repository at {} (ignore file: {})",
            root.display(),
            guard.has_ignore_file()
        );

        Ok(Self {
            root,
            guard,
            limits,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Confirmation for a successful initialization
    pub fn describe(&self, renderer: &Renderer) -> String {
        renderer.initialized(&self.repo_info())
    }

    /// Build the tree for `sub_path` (default: the root)
    pub fn structure(
        &self,
        sub_path: Option<&str>,
        max_depth: Option<usize>,
    ) -> Result<FileStructure, AccessError> {
        let walker = StructureWalker::new(&self.guard, &self.limits);

        let sub_path = sub_path.map(str::trim).filter(|s| !s.is_empty());
        let Some(sub_path) = sub_path else {
            return walker.walk(&self.root, "", 0, max_depth);
        };

        let target = self.root.join(sub_path);
        if !self.guard.is_contained(&target) {
            return Err(AccessError::OutsideRoot(sub_path.to_string()));
        }
        let relative = self
            .guard
            .relativize(sub_path)
            .ok_or_else(|| AccessError::OutsideRoot(sub_path.to_string()))?;
        if let Some(link) = self.guard.find_symlink(sub_path) {
            return Err(AccessError::Symlink(link));
        }
        if relative.is_empty() {
            return walker.walk(&self.root, "", 0, max_depth);
        }

        walker.walk(&self.root.join(&relative), &relative, 0, max_depth)
    }

    /// Read a file, refusing excluded paths up front
    pub fn read(&self, file_path: &str) -> Result<FileContent, AccessError> {
        if self.guard.is_excluded(file_path) {
            return Err(AccessError::Excluded(file_path.to_string()));
        }
        BoundedFileReader::new(&self.guard, &self.limits).read(file_path)
    }

    pub fn repo_info(&self) -> RepoInfo {
        RepoInfo {
            path: normalize_path(&self.root),
            exists: self.root.exists(),
            is_dir: self.root.is_dir(),
            has_ignore_file: self.root.join(crate::core::paths::IGNORE_FILE).exists(),
        }
    }

    /// Rendered outline, or a descriptive error
    pub fn get_structure(
        &self,
        renderer: &Renderer,
        sub_path: Option<&str>,
        max_depth: Option<usize>,
    ) -> String {
        match self.structure(sub_path, max_depth) {
            Ok(tree) => renderer.structure(&tree),
            Err(e) => renderer.error(STRUCTURE_ERROR, &e),
        }
    }

    /// Rendered file content block, or a descriptive error
    pub fn read_file(&self, renderer: &Renderer, file_path: &str) -> String {
        match self.read(file_path) {
            Ok(file) => renderer.file_content(&file),
            Err(e) => renderer.error(READ_ERROR, &e),
        }
    }

    pub fn get_repo_info(&self, renderer: &Renderer) -> String {
        renderer.repo_info(&self.repo_info())
    }
}
