//! Writes the `CI_MESSAGE` value to the run's workspace.

use cienv_host::{RunContext, WorkspaceDir, WorkspaceHandle};
use tracing::debug;

use crate::config::ContributorConfig;
use crate::decision::{RedirectOutcome, CI_MESSAGE_FILE, CI_MESSAGE_FILE_NAME};
use crate::error::RedirectError;
use crate::obs;

/// Find the directory the message file should live in.
///
/// A direct handle is used as-is. A pipeline run gets `subdir` under its
/// root directory, or the root itself if that child cannot be built.
pub fn resolve_workspace(run: &dyn RunContext, subdir: &str) -> Result<WorkspaceDir, RedirectError> {
    match run.workspace_handle() {
        WorkspaceHandle::Direct(Some(dir)) => Ok(dir),
        WorkspaceHandle::Direct(None) => Err(RedirectError::NoWorkspace {
            run_id: run.run_id().to_string(),
        }),
        WorkspaceHandle::Rooted(Some(root)) => match root.child(subdir) {
            Ok(dir) => Ok(dir),
            Err(e) => {
                debug!(root = %root, error = %e, "using run root as workspace");
                Ok(root)
            }
        },
        WorkspaceHandle::Rooted(None) => Err(RedirectError::NoRootDir {
            run_id: run.run_id().to_string(),
        }),
    }
}

/// Redirects a message value into `.ci_message.txt` under the workspace.
#[derive(Debug, Clone, Default)]
pub struct Redirector {
    config: ContributorConfig,
}

impl Redirector {
    pub fn new(config: ContributorConfig) -> Self {
        Self { config }
    }

    /// Write `value` to `.ci_message.txt` and point `CI_MESSAGE_FILE` at it.
    ///
    /// Never fails outright: resolution and I/O errors come back as
    /// `RedirectOutcome::Failure` so the caller can fall back.
    pub async fn redirect(&self, run: &dyn RunContext, value: &str) -> RedirectOutcome {
        self.redirect_to(run, CI_MESSAGE_FILE, CI_MESSAGE_FILE_NAME, value)
            .await
    }

    /// Write `value` to `file_name` under the workspace and point
    /// `pointer_name` at it.
    pub async fn redirect_to(
        &self,
        run: &dyn RunContext,
        pointer_name: &str,
        file_name: &str,
        value: &str,
    ) -> RedirectOutcome {
        match self.write(run, file_name, value).await {
            Ok(path) => {
                obs::emit_redirect_succeeded(&path, value);
                if self.config.verify_after_write {
                    verify(run, &path, value.len() as u64).await;
                }
                RedirectOutcome::Success {
                    pointer_name: pointer_name.to_string(),
                    path,
                }
            }
            Err(cause) => {
                obs::emit_redirect_failed(&cause, value);
                RedirectOutcome::Failure { cause }
            }
        }
    }

    async fn write(
        &self,
        run: &dyn RunContext,
        file_name: &str,
        value: &str,
    ) -> Result<String, RedirectError> {
        let dir = resolve_workspace(run, &self.config.workspace_subdir)?;
        let path = run.fs().write_text(&dir, file_name, value).await?;
        Ok(path)
    }
}

async fn verify(run: &dyn RunContext, path: &str, expected: u64) {
    match run.fs().file_size(path).await {
        Ok(actual) => obs::emit_verification(path, expected, actual),
        Err(e) => obs::emit_verification_error(path, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cienv_host::fakes::FakeRun;
    use cienv_host::HostError;
    use std::io;

    #[test]
    fn test_resolve_direct_handle() {
        let run = FakeRun::with_workspace("/ws/job");
        let dir = resolve_workspace(&run, "workspace").unwrap();
        assert_eq!(dir.remote(), "/ws/job");
    }

    #[test]
    fn test_resolve_direct_without_workspace_fails() {
        let run = FakeRun::without_workspace();
        let err = resolve_workspace(&run, "workspace").unwrap_err();
        assert!(matches!(err, RedirectError::NoWorkspace { .. }));
    }

    #[test]
    fn test_resolve_rooted_uses_subdir() {
        let run = FakeRun::rooted_at("/jobs/pipe/builds/4");
        let dir = resolve_workspace(&run, "workspace").unwrap();
        assert_eq!(dir.remote(), "/jobs/pipe/builds/4/workspace");
    }

    #[test]
    fn test_resolve_rooted_falls_back_to_root() {
        let run = FakeRun::rooted_at("/jobs/pipe/builds/4");
        let dir = resolve_workspace(&run, "../escape").unwrap();
        assert_eq!(dir.remote(), "/jobs/pipe/builds/4");
    }

    #[test]
    fn test_resolve_rooted_without_root_fails() {
        let run = FakeRun::new("p", WorkspaceHandle::Rooted(None));
        let err = resolve_workspace(&run, "workspace").unwrap_err();
        assert!(matches!(err, RedirectError::NoRootDir { ref run_id } if run_id == "p"));
    }

    #[tokio::test]
    async fn test_redirect_writes_file_and_returns_pointer() {
        let run = FakeRun::with_workspace("/ws");
        let outcome = Redirector::default().redirect(&run, "hello").await;
        match outcome {
            RedirectOutcome::Success { pointer_name, path } => {
                assert_eq!(pointer_name, "CI_MESSAGE_FILE");
                assert_eq!(path, "/ws/.ci_message.txt");
                assert_eq!(run.memory_fs().contents(&path).as_deref(), Some("hello"));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_redirect_twice_overwrites() {
        let run = FakeRun::with_workspace("/ws");
        let redirector = Redirector::default();
        redirector.redirect(&run, "same").await;
        redirector.redirect(&run, "same").await;
        assert_eq!(run.memory_fs().file_count(), 1);
        assert_eq!(
            run.memory_fs().contents("/ws/.ci_message.txt").as_deref(),
            Some("same")
        );
    }

    #[tokio::test]
    async fn test_redirect_write_error_is_failure() {
        let run = FakeRun::with_workspace("/ws");
        run.memory_fs().fail_writes(io::ErrorKind::PermissionDenied);
        let outcome = Redirector::default().redirect(&run, "hello").await;
        match outcome {
            RedirectOutcome::Failure {
                cause: RedirectError::Write(HostError::Io { source, .. }),
            } => assert_eq!(source.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("expected write failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_redirect_interrupted_is_failure() {
        let run = FakeRun::with_workspace("/ws");
        run.memory_fs().fail_writes(io::ErrorKind::Interrupted);
        let outcome = Redirector::default().redirect(&run, "hello").await;
        assert!(matches!(
            outcome,
            RedirectOutcome::Failure {
                cause: RedirectError::Write(HostError::Interrupted { .. })
            }
        ));
    }

    #[tokio::test]
    async fn test_redirect_to_uses_given_names() {
        let run = FakeRun::with_workspace("/ws");
        let outcome = Redirector::default()
            .redirect_to(&run, "BUILD_NOTES_FILE", ".notes.txt", "notes")
            .await;
        match outcome {
            RedirectOutcome::Success { pointer_name, path } => {
                assert_eq!(pointer_name, "BUILD_NOTES_FILE");
                assert_eq!(path, "/ws/.notes.txt");
                assert_eq!(run.memory_fs().contents(&path).as_deref(), Some("notes"));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_verification_keeps_success() {
        let run = FakeRun::with_workspace("/ws");
        run.memory_fs().hide_files();
        let outcome = Redirector::default().redirect(&run, "hello").await;
        assert!(outcome.is_success());
    }
}
