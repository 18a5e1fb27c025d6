//! Error types for cienv-host

use std::io;

use thiserror::Error;

/// Errors raised by host collaborators.
#[derive(Error, Debug)]
pub enum HostError {
    /// A child path could not be built under a workspace directory
    #[error("cannot create child {name:?} under {parent:?}")]
    InvalidChild { parent: String, name: String },

    /// The write was interrupted before it completed
    #[error("interrupted while writing {path}")]
    Interrupted { path: String },

    /// Any other I/O failure
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl HostError {
    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: impl Into<String>, err: io::Error) -> Self {
        let path = path.into();
        if err.kind() == io::ErrorKind::Interrupted {
            HostError::Interrupted { path }
        } else {
            HostError::Io { path, source: err }
        }
    }
}

/// Result type for host operations
pub type HostResult<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_kind_maps_to_interrupted() {
        let err = HostError::from_io("/ws/a", io::Error::from(io::ErrorKind::Interrupted));
        assert!(matches!(err, HostError::Interrupted { ref path } if path == "/ws/a"));
    }

    #[test]
    fn test_other_kinds_keep_source() {
        let err = HostError::from_io(
            "/ws/a",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        match err {
            HostError::Io { path, source } => {
                assert_eq!(path, "/ws/a");
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }
}
