use crate::domain::Entry;
use crate::error::ExplorerError;
use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub trait DirectorySource {
    /// Entries of `dir` in enumeration order, without the parent entry.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, ExplorerError>;

    /// Resolves `name` against `current` and returns the new directory.
    fn change_dir(&self, current: &Path, name: &OsStr) -> Result<PathBuf, ExplorerError>;
}

pub trait CommandRunner {
    /// Runs `program` in `dir`, returning stdout followed by stderr.
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectory;

impl DirectorySource for FsDirectory {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, ExplorerError> {
        let read_dir = fs::read_dir(dir).map_err(|source| ExplorerError::OpenDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let read_err = |source: io::Error| ExplorerError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(read_err)?;
            // file_type does not follow symlinks, so a link to a directory
            // is listed as a plain entry.
            let is_dir = item.file_type().map_err(read_err)?.is_dir();
            entries.push(Entry::new(item.file_name(), is_dir));
        }
        Ok(entries)
    }

    fn change_dir(&self, current: &Path, name: &OsStr) -> Result<PathBuf, ExplorerError> {
        let candidate = current.join(name);
        let change_err = |source: io::Error| ExplorerError::ChangeDir {
            path: candidate.clone(),
            source,
        };

        let resolved = fs::canonicalize(&candidate).map_err(change_err)?;
        let metadata = fs::metadata(&resolved).map_err(change_err)?;
        if !metadata.is_dir() {
            return Err(change_err(io::Error::from(io::ErrorKind::NotADirectory)));
        }
        Ok(resolved)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandRunner;

impl CommandRunner for ShellCommandRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to execute {program} {args:?}"))?;

        if !output.status.success() {
            bail!("{program} exited with {}", output.status);
        }

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[test]
    fn list_reports_names_and_kinds() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("sub")).expect("mkdir");
        fs::write(dir.path().join("a.txt"), "x").expect("write");

        let entries = FsDirectory.list(dir.path()).expect("list");
        let got: BTreeSet<_> = entries
            .iter()
            .map(|e| (e.label().into_owned(), e.is_dir()))
            .collect();
        assert_eq!(
            got,
            BTreeSet::from([("a.txt".to_string(), false), ("sub".to_string(), true)])
        );
    }

    #[test]
    fn list_of_missing_dir_fails_on_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = FsDirectory
            .list(&dir.path().join("missing"))
            .expect_err("missing dir");
        assert!(matches!(err, ExplorerError::OpenDir { .. }));
        assert_eq!(err.location(), "listing: opening dir");
    }

    #[test]
    fn change_dir_descends_and_climbs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = fs::canonicalize(dir.path()).expect("canonical root");
        fs::create_dir(root.join("sub")).expect("mkdir");

        let sub = FsDirectory
            .change_dir(&root, OsStr::new("sub"))
            .expect("enter sub");
        assert_eq!(sub, root.join("sub"));

        let back = FsDirectory
            .change_dir(&sub, OsStr::new(".."))
            .expect("climb");
        assert_eq!(back, root);
    }

    #[test]
    fn change_dir_rejects_files_and_missing_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.txt"), "x").expect("write");

        let err = FsDirectory
            .change_dir(dir.path(), OsStr::new("a.txt"))
            .expect_err("file is not a dir");
        assert!(matches!(err, ExplorerError::ChangeDir { .. }));

        let err = FsDirectory
            .change_dir(dir.path(), OsStr::new("gone"))
            .expect_err("missing dir");
        assert_eq!(err.location(), "enter dir: changing dir");
    }

    #[cfg(unix)]
    #[test]
    fn runner_captures_stdout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = ShellCommandRunner
            .run(dir.path(), "echo", &["hi"])
            .expect("echo runs");
        assert_eq!(out, b"hi\n".to_vec());
    }

    #[cfg(unix)]
    #[test]
    fn runner_appends_stderr_after_stdout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = ShellCommandRunner
            .run(dir.path(), "sh", &["-c", "echo err 1>&2; echo out"])
            .expect("sh runs");
        assert_eq!(String::from_utf8_lossy(&out), "out\nerr\n");
    }

    #[cfg(unix)]
    #[test]
    fn runner_uses_given_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("marker"), "").expect("write");
        let out = ShellCommandRunner
            .run(dir.path(), "ls", &[])
            .expect("ls runs");
        assert!(String::from_utf8_lossy(&out).contains("marker"));
    }

    #[cfg(unix)]
    #[test]
    fn runner_fails_on_unknown_program_and_nonzero_exit() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(
            ShellCommandRunner
                .run(dir.path(), "not-a-real-command", &[])
                .is_err()
        );
        assert!(ShellCommandRunner.run(dir.path(), "false", &[]).is_err());
    }
}
