//! cienv Core Library
//!
//! Contributes variables from an inbound CI message to a running build's
//! environment. Every variable is classified (skip, inject, or redirect);
//! `CI_MESSAGE` goes to `.ci_message.txt` in the workspace with
//! `CI_MESSAGE_FILE` pointing at it, falling back to a plain environment
//! variable whenever the file cannot be written.

pub mod classifier;
pub mod config;
pub mod contributor;
pub mod decision;
pub mod error;
pub mod obs;
pub mod redirect;
pub mod telemetry;

pub use classifier::classify;
pub use config::ContributorConfig;
pub use contributor::{ContributionReport, EnvContributor, MessageDelivery};
pub use decision::{
    Decision, RedirectOutcome, ReservedNames, SkipReason, CI_MESSAGE, CI_MESSAGE_FILE,
    CI_MESSAGE_FILE_NAME, DEFAULT_WORKSPACE_SUBDIR,
};
pub use error::{ConfigError, ConfigResult, RedirectError};
pub use obs::ContributionSpan;
pub use redirect::{resolve_workspace, Redirector};
pub use telemetry::{init_tracing, init_tracing_from_env};

pub use cienv_host::{
    EnvLookup, EnvTarget, EnvVars, HostError, LocalFs, LocalRun, RunContext, WorkspaceDir,
    WorkspaceFs, WorkspaceHandle,
};
