//! Runs and the workspace they expose.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fs::{LocalFs, WorkspaceFs};
use crate::workspace::WorkspaceDir;

/// How a run makes its working directory reachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "dir", rename_all = "snake_case")]
pub enum WorkspaceHandle {
    /// Build-style run with its own workspace handle. `None` when the
    /// host has not allocated one (for example, no executor assigned).
    Direct(Option<WorkspaceDir>),
    /// Pipeline-style run that only knows its persisted root directory.
    Rooted(Option<WorkspaceDir>),
}

/// One build or pipeline run, as seen by an environment contributor.
pub trait RunContext: Send + Sync {
    /// Identifier used in diagnostics.
    fn run_id(&self) -> &str;

    fn workspace_handle(&self) -> WorkspaceHandle;

    /// File access on the node hosting this run's workspace.
    fn fs(&self) -> &dyn WorkspaceFs;
}

/// A run whose workspace lives on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalRun {
    run_id: String,
    handle: WorkspaceHandle,
    fs: LocalFs,
}

impl LocalRun {
    /// A build-style run with a direct workspace handle.
    pub fn build(run_id: impl Into<String>, workspace: Option<PathBuf>) -> Self {
        Self {
            run_id: run_id.into(),
            handle: WorkspaceHandle::Direct(workspace.map(WorkspaceDir::from)),
            fs: LocalFs,
        }
    }

    /// A pipeline-style run that only exposes its root directory.
    pub fn pipeline(run_id: impl Into<String>, root_dir: Option<PathBuf>) -> Self {
        Self {
            run_id: run_id.into(),
            handle: WorkspaceHandle::Rooted(root_dir.map(WorkspaceDir::from)),
            fs: LocalFs,
        }
    }
}

impl RunContext for LocalRun {
    fn run_id(&self) -> &str {
        &self.run_id
    }

    fn workspace_handle(&self) -> WorkspaceHandle {
        self.handle.clone()
    }

    fn fs(&self) -> &dyn WorkspaceFs {
        &self.fs
    }
}
