//! File operations under a workspace directory.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{HostError, HostResult};
use crate::workspace::WorkspaceDir;

/// File access on the node that holds a run's workspace.
#[async_trait]
pub trait WorkspaceFs: Send + Sync {
    /// Write `content` as UTF-8 to `file_name` directly under `dir`.
    ///
    /// Missing parent directories are created. Existing content is
    /// truncated, never appended to. Returns the remote path of the file.
    async fn write_text(&self, dir: &WorkspaceDir, file_name: &str, content: &str)
        -> HostResult<String>;

    /// Size in bytes of the file at `remote`, or `None` if it does not exist.
    async fn file_size(&self, remote: &str) -> HostResult<Option<u64>>;
}

/// Workspace file access on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl WorkspaceFs for LocalFs {
    async fn write_text(
        &self,
        dir: &WorkspaceDir,
        file_name: &str,
        content: &str,
    ) -> HostResult<String> {
        let target = dir.child(file_name)?;
        let remote = target.remote();

        tokio::fs::create_dir_all(dir.path())
            .await
            .map_err(|e| HostError::from_io(dir.remote(), e))?;

        // File is closed when dropped, on every exit path.
        let mut file = tokio::fs::File::create(target.path())
            .await
            .map_err(|e| HostError::from_io(remote.as_str(), e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| HostError::from_io(remote.as_str(), e))?;
        file.flush()
            .await
            .map_err(|e| HostError::from_io(remote.as_str(), e))?;

        debug!(path = %remote, bytes = content.len(), "wrote workspace file");
        Ok(remote)
    }

    async fn file_size(&self, remote: &str) -> HostResult<Option<u64>> {
        match tokio::fs::metadata(remote).await {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HostError::from_io(remote, e)),
        }
    }
}
