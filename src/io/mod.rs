//! Run-scoped output channel.

use crate::core::errors::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output file opened for the duration of one generation run.
///
/// The file is created (or truncated) eagerly so writability problems
/// surface before any extraction work. The channel ends in exactly one of
/// two ways: [`commit`](OutputChannel::commit) flushes and keeps the file,
/// [`discard`](OutputChannel::discard) deletes it along with anything
/// already written.
pub struct OutputChannel {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl OutputChannel {
    pub fn create(path: &Path) -> Result<Self, Error> {
        let file = File::create(path).map_err(|e| {
            Error::file_system_with_source(
                format!("cannot write to {}", path.display()),
                path,
                e,
            )
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&mut self) -> &mut impl Write {
        &mut self.writer
    }

    pub fn commit(mut self) -> Result<(), Error> {
        self.writer.flush().map_err(|e| {
            Error::file_system_with_source(
                format!("cannot write to {}", self.path.display()),
                self.path.clone(),
                e,
            )
        })
    }

    pub fn discard(self) -> Result<(), Error> {
        let Self { writer, path } = self;
        drop(writer);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::file_system_with_source(
                format!("cannot delete {}", path.display()),
                path,
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_keeps_written_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.xml");
        let mut channel = OutputChannel::create(&path).unwrap();
        writeln!(channel.writer(), "<rule/>").unwrap();
        channel.commit().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<rule/>\n");
    }

    #[test]
    fn test_discard_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.xml");
        let mut channel = OutputChannel::create(&path).unwrap();
        writeln!(channel.writer(), "partial").unwrap();
        channel.discard().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_create_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.xml");
        fs::write(&path, "stale").unwrap();
        let channel = OutputChannel::create(&path).unwrap();
        channel.commit().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_create_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/rules.xml");
        assert!(OutputChannel::create(&path).is_err());
    }
}
