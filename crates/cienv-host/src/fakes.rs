//! In-memory fakes for host traits (testing only)
//!
//! Provides `MemoryFs` and `FakeRun` that satisfy the trait contracts
//! without touching disk, plus failure injection for write paths.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{HostError, HostResult};
use crate::fs::WorkspaceFs;
use crate::run::{RunContext, WorkspaceHandle};
use crate::workspace::WorkspaceDir;

// ---------------------------------------------------------------------------
// MemoryFs
// ---------------------------------------------------------------------------

/// In-memory workspace files backed by a `HashMap<remote path, content>`.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<Option<io::ErrorKind>>,
    hide_files: Mutex<bool>,
    writes: AtomicUsize,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with an error of `kind`.
    pub fn fail_writes(&self, kind: io::ErrorKind) {
        *self.fail_writes.lock().unwrap() = Some(kind);
    }

    /// Make `file_size` report every file as missing.
    pub fn hide_files(&self) {
        *self.hide_files.lock().unwrap() = true;
    }

    pub fn contents(&self, remote: &str) -> Option<String> {
        self.files.lock().unwrap().get(remote).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkspaceFs for MemoryFs {
    async fn write_text(
        &self,
        dir: &WorkspaceDir,
        file_name: &str,
        content: &str,
    ) -> HostResult<String> {
        let remote = dir.child(file_name)?.remote();
        if let Some(kind) = *self.fail_writes.lock().unwrap() {
            return Err(HostError::from_io(remote, io::Error::from(kind)));
        }
        self.files
            .lock()
            .unwrap()
            .insert(remote.clone(), content.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(remote)
    }

    async fn file_size(&self, remote: &str) -> HostResult<Option<u64>> {
        if *self.hide_files.lock().unwrap() {
            return Ok(None);
        }
        let files = self.files.lock().unwrap();
        Ok(files.get(remote).map(|c| c.len() as u64))
    }
}

// ---------------------------------------------------------------------------
// FakeRun
// ---------------------------------------------------------------------------

/// A run with a configurable workspace handle and an in-memory filesystem.
#[derive(Debug)]
pub struct FakeRun {
    run_id: String,
    handle: WorkspaceHandle,
    fs: MemoryFs,
}

impl FakeRun {
    pub fn new(run_id: impl Into<String>, handle: WorkspaceHandle) -> Self {
        Self {
            run_id: run_id.into(),
            handle,
            fs: MemoryFs::new(),
        }
    }

    /// A build-style run whose workspace is `dir`.
    pub fn with_workspace(dir: &str) -> Self {
        Self::new(
            "fake-build",
            WorkspaceHandle::Direct(Some(WorkspaceDir::new(dir))),
        )
    }

    /// A build-style run with no workspace allocated.
    pub fn without_workspace() -> Self {
        Self::new("fake-build", WorkspaceHandle::Direct(None))
    }

    /// A pipeline-style run rooted at `root`.
    pub fn rooted_at(root: &str) -> Self {
        Self::new(
            "fake-pipeline",
            WorkspaceHandle::Rooted(Some(WorkspaceDir::new(root))),
        )
    }

    pub fn memory_fs(&self) -> &MemoryFs {
        &self.fs
    }
}

impl RunContext for FakeRun {
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
