use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the explorer loop.
///
/// Every variant carries a short location tag describing which step failed,
/// reported next to the cause when the loop halts.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("cannot open directory {}", .path.display())]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read entries of {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot change directory to {}", .path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal output failed")]
    Display {
        location: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to read key")]
    ReadKey {
        #[source]
        source: io::Error,
    },

    #[error("error getting command string")]
    ReadLine {
        #[source]
        source: io::Error,
    },
}

impl ExplorerError {
    pub fn location(&self) -> &'static str {
        match self {
            Self::OpenDir { .. } => "listing: opening dir",
            Self::ReadDir { .. } => "listing: reading dir",
            Self::ChangeDir { .. } => "enter dir: changing dir",
            Self::Display { location, .. } => *location,
            Self::ReadKey { .. } => "event loop: reading key",
            Self::ReadLine { .. } => "command mode: reading line",
        }
    }

    pub(crate) fn display(location: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Display { location, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_a_location() {
        let errors = [
            ExplorerError::OpenDir {
                path: PathBuf::from("/x"),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
            ExplorerError::ChangeDir {
                path: PathBuf::from("/x/y"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
            ExplorerError::display("render: full repaint")(io::Error::other("closed")),
            ExplorerError::ReadLine {
                source: io::Error::from(io::ErrorKind::UnexpectedEof),
            },
        ];
        for err in errors {
            assert!(!err.location().is_empty(), "{err:?}");
        }
    }

    #[test]
    fn source_chain_includes_io_cause() {
        let err = ExplorerError::ChangeDir {
            path: PathBuf::from("/nope"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert!(rendered.contains("/nope"));
        assert!(rendered.contains("no such file"));
    }
}
