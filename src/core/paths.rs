//! Path normalization, containment and exclusion matching
//!
//! All paths handed out by the crate are relative to the repository root and
//! use '/' as separator. [`PathGuard`] decides whether a candidate path is safe
//! to touch and whether it is hidden by the exclusion ruleset.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Patterns that are always excluded, ahead of the root's ignore file
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", "__pycache__", "node_modules"];

/// Name of the root-level ignore file
pub const IGNORE_FILE: &str = ".gitignore";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Join a root-relative child name onto a parent's relative path
pub fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Lexically normalize a caller-supplied relative path.
///
/// Drops `.` components and resolves `..` against earlier components.
/// Returns `None` for absolute input or when `..` climbs above the start.
pub fn normalize_relative(input: &str) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(&input.replace('\\', "/")).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.join("/"))
}

/// Resolve a path to an absolute, symlink-free form.
///
/// Unlike `canonicalize`, the target does not need to exist: the longest
/// existing prefix is canonicalized and the remaining components are applied
/// lexically.
pub fn resolve_lenient(path: &Path) -> Option<PathBuf> {
    let components: Vec<Component> = path.components().collect();
    for split in (1..=components.len()).rev() {
        let head: PathBuf = components[..split].iter().collect();
        let Ok(mut resolved) = head.canonicalize() else {
            continue;
        };
        for component in &components[split..] {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(name) => resolved.push(name),
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        return Some(resolved);
    }
    None
}

/// Validate that a path is within the root directory (prevent path traversal)
pub fn is_within_root(path: &Path, root: &Path) -> bool {
    match (resolve_lenient(path), root.canonicalize()) {
        (Some(p), Ok(r)) => p.starts_with(r),
        _ => false,
    }
}

/// Containment and exclusion checks against a fixed repository root
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
    excludes: Gitignore,
    has_ignore_file: bool,
}

impl PathGuard {
    /// Build a guard for `root` with the default excludes followed by the
    /// patterns of `<root>/.gitignore`, if present.
    ///
    /// `root` is expected to be canonical already.
    pub fn new(root: &Path) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in DEFAULT_EXCLUDES {
            add_pattern(&mut builder, pattern);
        }

        let ignore_path = root.join(IGNORE_FILE);
        let has_ignore_file = ignore_path.is_file();
        if has_ignore_file {
            match fs::read_to_string(&ignore_path) {
                Ok(contents) => {
                    for line in contents.lines() {
                        let line = line.trim();
                        if !line.is_empty() && !line.starts_with('#') {
                            add_pattern(&mut builder, line);
                        }
                    }
                }
                Err(e) => warn!("Error reading {}: {}", ignore_path.display(), e),
            }
        }

        let excludes = builder.build().unwrap_or_else(|e| {
            warn!("Failed to compile exclusion patterns: {}", e);
            Gitignore::empty()
        });

        Self {
            root: root.to_path_buf(),
            excludes,
            has_ignore_file,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the root carried an ignore file when the guard was built
    pub fn has_ignore_file(&self) -> bool {
        self.has_ignore_file
    }

    /// True iff the resolved candidate lies within the resolved root
    pub fn is_contained(&self, candidate: &Path) -> bool {
        is_within_root(candidate, &self.root)
    }

    /// Check a root-relative path against the exclusion ruleset, taking
    /// directory-ness from the filesystem (links are not followed).
    pub fn is_excluded(&self, relative: &str) -> bool {
        let is_dir = fs::symlink_metadata(self.root.join(relative))
            .map(|m| m.is_dir())
            .unwrap_or(false);
        self.is_excluded_entry(relative, is_dir)
    }

    /// Root-relative, lexically normalized form of `input`. Rooted input is
    /// accepted when it lies under the root. `None` when the path leaves it.
    pub fn relativize(&self, input: &str) -> Option<String> {
        let path = Path::new(input);
        if path.has_root() {
            make_relative(path, &self.root).and_then(|stripped| normalize_relative(&stripped))
        } else {
            normalize_relative(input)
        }
    }

    /// First component of `input` that is a symbolic link, walking down from
    /// the root. Components are checked as written, before any `..` folding.
    pub fn find_symlink(&self, input: &str) -> Option<String> {
        let path = Path::new(input);
        let path = if path.has_root() {
            path.strip_prefix(&self.root).ok()?
        } else {
            path
        };

        let mut current = self.root.clone();
        let mut shown = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => {
                    current.push(name);
                    shown.push(name);
                }
                Component::ParentDir => {
                    current.push("..");
                    shown.push("..");
                    continue;
                }
                _ => continue,
            }
            let is_link = fs::symlink_metadata(&current)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false);
            if is_link {
                return Some(normalize_path(&shown));
            }
        }
        None
    }

    /// Check a root-relative path whose type is already known.
    ///
    /// Ancestors are matched top-down before the path itself: once a
    /// directory is excluded, nothing below it can be re-included, the same
    /// as git.
    pub fn is_excluded_entry(&self, relative: &str, is_dir: bool) -> bool {
        // outside the root: containment rejects it instead
        let Some(normalized) = self.relativize(relative) else {
            return false;
        };
        if normalized.is_empty() {
            return false;
        }

        let mut prefix = String::new();
        let mut parts = normalized.split('/').peekable();
        while let Some(part) = parts.next() {
            prefix = join_relative(&prefix, part);
            let prefix_is_dir = parts.peek().is_some() || is_dir;
            if self.excludes.matched(&prefix, prefix_is_dir).is_ignore() {
                debug!("Excluded by ignore rules: {} (via {})", normalized, prefix);
                return true;
            }
        }
        false
    }
}

fn add_pattern(builder: &mut GitignoreBuilder, pattern: &str) {
    if let Err(e) = builder.add_line(None, pattern) {
        warn!("Skipping invalid ignore pattern {:?}: {}", pattern, e);
    }
}
