//! Filesystem seam - raw lines in, writable text out
//!
//! The store never touches the filesystem directly; it reads through a
//! [`LineSource`] and writes through a [`TextSink`]. [`FsAccess`] is the
//! direct `std::fs` implementation of both.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;

/// Produces raw configuration lines for a resolved path
pub trait LineSource {
    /// All lines of the file, or `None` when it does not exist
    fn read_lines(&self, path: &Path) -> Result<Option<Vec<String>>, ConfigError>;
}

/// Opens writable text destinations, creating parent directories as needed
pub trait TextSink {
    fn create(&self, path: &Path) -> Result<Box<dyn Write>, ConfigError>;
}

/// Direct filesystem access
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAccess;

impl LineSource for FsAccess {
    fn read_lines(&self, path: &Path) -> Result<Option<Vec<String>>, ConfigError> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()?;
        debug!(path = %path.display(), lines = lines.len(), "read configuration file");
        Ok(Some(lines))
    }
}

impl TextSink for FsAccess {
    fn create(&self, path: &Path) -> Result<Box<dyn Write>, ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Box::new(fs::File::create(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_lines_missing_file() {
        let dir = tempdir().unwrap();
        let lines = FsAccess.read_lines(&dir.path().join("absent.cfg")).unwrap();
        assert!(lines.is_none());
    }

    #[test]
    fn test_read_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.cfg");
        fs::write(&path, "[sound]\nnVolume = 80\n").unwrap();

        let lines = FsAccess.read_lines(&path).unwrap().unwrap();
        assert_eq!(lines, vec!["[sound]", "nVolume = 80"]);
    }

    #[test]
    fn test_create_makes_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("test.cfg");

        let mut out = FsAccess.create(&path).unwrap();
        out.write_all(b"[sound]\n").unwrap();
        drop(out);

        assert_eq!(fs::read_to_string(&path).unwrap(), "[sound]\n");
    }
}
