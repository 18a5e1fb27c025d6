use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HostError, HostResult};

/// A directory on the host, addressed by its (possibly remote) path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceDir(PathBuf);

impl WorkspaceDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// The path as the host reports it to build steps.
    pub fn remote(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }

    /// A direct child of this directory.
    ///
    /// Fails when the parent path is empty or `name` is not a single
    /// plain path component.
    pub fn child(&self, name: &str) -> HostResult<WorkspaceDir> {
        let invalid = || HostError::InvalidChild {
            parent: self.remote(),
            name: name.to_string(),
        };

        if self.0.as_os_str().is_empty() || !Self::is_valid_child_name(name) {
            return Err(invalid());
        }

        Ok(Self(self.0.join(name)))
    }

    /// Whether `name` is a single plain path component accepted by `child`.
    pub fn is_valid_child_name(name: &str) -> bool {
        !(name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']))
    }
}

impl fmt::Display for WorkspaceDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for WorkspaceDir {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}
