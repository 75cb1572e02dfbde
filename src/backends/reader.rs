//! Reader backend - size- and line-bounded reads of a single file

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::core::config::Limits;
use crate::core::error::AccessError;
use crate::core::language::Language;
use crate::core::model::FileContent;
use crate::core::paths::{make_relative, PathGuard};

/// Bytes inspected for NUL characters before decoding
const BINARY_SNIFF_LEN: usize = 8192;

pub struct BoundedFileReader<'a> {
    guard: &'a PathGuard,
    max_file_size: u64,
    max_lines: usize,
}

impl<'a> BoundedFileReader<'a> {
    pub fn new(guard: &'a PathGuard, limits: &Limits) -> Self {
        Self {
            guard,
            max_file_size: limits.max_file_size,
            max_lines: limits.max_lines,
        }
    }

    /// Read a root-relative file, bounded by the size and line limits
    pub fn read(&self, relative: &str) -> Result<FileContent, AccessError> {
        let full_path = self.guard.root().join(relative);

        if !self.guard.is_contained(&full_path) {
            return Err(AccessError::OutsideRoot(relative.to_string()));
        }
        if let Some(link) = self.guard.find_symlink(relative) {
            return Err(AccessError::Symlink(link));
        }

        let metadata = fs::symlink_metadata(&full_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AccessError::NotFound(relative.to_string()),
            _ => AccessError::io(relative, e),
        })?;
        if metadata.file_type().is_symlink() {
            return Err(AccessError::Symlink(relative.to_string()));
        }

        // the resolved target is matched too, whatever spelling reached it
        let resolved = full_path
            .canonicalize()
            .map_err(|e| AccessError::io(relative, e))?;
        if let Some(resolved) = make_relative(&resolved, self.guard.root()) {
            if self.guard.is_excluded_entry(&resolved, metadata.is_dir()) {
                return Err(AccessError::Excluded(relative.to_string()));
            }
        }

        if !metadata.is_file() {
            return Err(AccessError::NotAFile(relative.to_string()));
        }

        let size = metadata.len();
        if size > self.max_file_size {
            return Err(AccessError::TooLarge {
                path: relative.to_string(),
                size,
                max: self.max_file_size,
            });
        }

        let (lines, truncated) = self.read_lines(&full_path, relative)?;
        let count = lines.len();
        let mut content = lines.join("\n");
        if truncated {
            content.push_str(&format!(
                "\n\n[File truncated after {} lines]",
                self.max_lines
            ));
        }

        Ok(FileContent {
            path: relative.to_string(),
            language: Language::detect(Path::new(relative)),
            size,
            lines: count,
            truncated,
            content,
        })
    }

    /// Read at most `max_lines` lines; the flag is set when more exist
    fn read_lines(&self, path: &Path, relative: &str) -> Result<(Vec<String>, bool), AccessError> {
        let file = File::open(path).map_err(|e| AccessError::io(relative, e))?;
        let mut reader = BufReader::with_capacity(BINARY_SNIFF_LEN, file);

        let head = reader.fill_buf().map_err(|e| AccessError::io(relative, e))?;
        if head.contains(&0) {
            return Err(AccessError::Binary(relative.to_string()));
        }

        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| match e.kind() {
                io::ErrorKind::InvalidData => AccessError::Binary(relative.to_string()),
                _ => AccessError::io(relative, e),
            })?;
            if lines.len() == self.max_lines {
                return Ok((lines, true));
            }
            lines.push(line);
        }

        Ok((lines, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathGuard) {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let guard = PathGuard::new(&root);
        (temp, root, guard)
    }

    fn numbered_lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {}\n", i)).collect()
    }

    #[test]
    fn test_read_success() {
        let (_temp, root, guard) = setup();
        let text = "# Title\n\nSome words here to reach fifty bytes!!!!\n";
        assert_eq!(text.len(), 50);
        fs::write(root.join("README.md"), text).unwrap();

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let file = reader.read("README.md").unwrap();
        assert_eq!(file.language, Language::Markdown);
        assert_eq!(file.size, 50);
        assert_eq!(file.lines, 3);
        assert!(!file.truncated);
        assert_eq!(file.content, "# Title\n\nSome words here to reach fifty bytes!!!!");
    }

    #[test]
    fn test_exactly_max_lines_not_truncated() {
        let (_temp, root, guard) = setup();
        fs::write(root.join("a.txt"), numbered_lines(1000)).unwrap();

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let file = reader.read("a.txt").unwrap();
        assert!(!file.truncated);
        assert_eq!(file.lines, 1000);
        assert!(!file.content.contains("[File truncated"));
        assert!(file.content.ends_with("line 1000"));
    }

    #[test]
    fn test_one_over_max_lines_truncated() {
        let (_temp, root, guard) = setup();
        fs::write(root.join("a.txt"), numbered_lines(1001)).unwrap();

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let file = reader.read("a.txt").unwrap();
        assert!(file.truncated);
        assert_eq!(file.lines, 1000);
        assert!(file
            .content
            .ends_with("line 1000\n\n[File truncated after 1000 lines]"));
        assert!(!file.content.contains("line 1001"));
    }

    #[test]
    fn test_crlf_line_endings_stripped() {
        let (_temp, root, guard) = setup();
        fs::write(root.join("win.bat"), "@echo off\r\necho hi\r\n").unwrap();

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let file = reader.read("win.bat").unwrap();
        assert_eq!(file.content, "@echo off\necho hi");
        assert_eq!(file.language, Language::Batch);
    }

    #[test]
    fn test_empty_file() {
        let (_temp, root, guard) = setup();
        fs::write(root.join("empty.py"), "").unwrap();

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let file = reader.read("empty.py").unwrap();
        assert_eq!(file.lines, 0);
        assert_eq!(file.content, "");
    }

    #[test]
    fn test_too_large() {
        let (_temp, root, guard) = setup();
        fs::write(root.join("big.log"), "x".repeat(64)).unwrap();
        let limits = Limits {
            max_file_size: 32,
            ..Default::default()
        };

        let reader = BoundedFileReader::new(&guard, &limits);
        let err = reader.read("big.log").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceLimit);
        assert_eq!(
            err.to_string(),
            "File big.log is too large (64 bytes). Maximum size is 32 bytes."
        );
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        let (_temp, root, guard) = setup();
        fs::write(root.join("bad.txt"), [0x48, 0x69, 0xFF, 0xFE, 0x0A]).unwrap();

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let err = reader.read("bad.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_nul_bytes_are_binary() {
        let (_temp, root, guard) = setup();
        fs::write(root.join("blob.dat"), [0x00, 0x01, 0x02, 0x00]).unwrap();

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let err = reader.read("blob.dat").unwrap_err();
        assert!(matches!(err, AccessError::Binary(_)));
    }

    #[test]
    fn test_escape_rejected() {
        let (temp, _root, _guard) = setup();
        let repo = temp.path().join("repo");
        fs::create_dir(&repo).unwrap();
        fs::write(temp.path().join("secret.txt"), "top secret").unwrap();
        let guard = PathGuard::new(&repo.canonicalize().unwrap());

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let err = reader.read("../secret.txt").unwrap_err();
        assert!(matches!(err, AccessError::OutsideRoot(_)));
        assert!(!err.to_string().contains("top secret"));
    }

    #[test]
    fn test_absolute_path_outside_rejected() {
        let (_temp, _root, guard) = setup();
        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let err = reader.read("/etc/hostname").unwrap_err();
        assert!(matches!(err, AccessError::OutsideRoot(_)));
    }

    #[test]
    fn test_missing_file() {
        let (_temp, _root, guard) = setup();
        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let err = reader.read("missing.rs").unwrap_err();
        assert_eq!(err.to_string(), "Path missing.rs not found");
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let (_temp, root, guard) = setup();
        fs::create_dir(root.join("src")).unwrap();
        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let err = reader.read("src").unwrap_err();
        assert!(matches!(err, AccessError::NotAFile(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_rejected() {
        let (_temp, root, guard) = setup();
        fs::write(root.join("real.txt"), "real").unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let err = reader.read("link.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedPath);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_directory_in_path_rejected() {
        let (_temp, root, _guard) = setup();
        fs::write(root.join(".gitignore"), "secret/\n").unwrap();
        fs::create_dir(root.join("secret")).unwrap();
        fs::write(root.join("secret/key.txt"), "TOPSECRET").unwrap();
        std::os::unix::fs::symlink(root.join("secret"), root.join("pub")).unwrap();
        let guard = PathGuard::new(&root);

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        for path in ["pub/key.txt", "./pub/key.txt", "secret/../pub/key.txt"] {
            let err = reader.read(path).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedPath, "{}", path);
            assert!(!err.to_string().contains("TOPSECRET"));
        }
    }

    #[test]
    fn test_excluded_target_rejected_by_resolved_path() {
        let (_temp, root, _guard) = setup();
        fs::write(root.join(".gitignore"), "build/\n!build/keep.txt\n").unwrap();
        fs::create_dir(root.join("build")).unwrap();
        fs::write(root.join("build/keep.txt"), "kept").unwrap();
        let guard = PathGuard::new(&root);

        let reader = BoundedFileReader::new(&guard, &Limits::default());
        let err = reader.read("build/keep.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExcludedPath);
    }
}
