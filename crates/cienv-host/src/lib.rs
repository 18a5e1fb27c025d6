//! cienv-host: Host Interfaces for cienv
//!
//! This crate describes the slice of the host build system that cienv
//! touches. The host owns runs, workspaces and environments; cienv only
//! reads and writes through the traits defined here.
//!
//! ## Layer 0 - Host/Workspace
//!
//! Focus: A narrow, swappable boundary between decision logic and the host.
//!
//! ## Key Components
//!
//! - `RunContext`: One build or pipeline run and the workspace it exposes
//! - `WorkspaceFs`: UTF-8 file writes and existence checks under a workspace
//! - `EnvLookup` / `EnvTarget`: Read/write access to a run's environment
//! - `fakes`: In-memory implementations for tests

mod env;
mod error;
pub mod fakes;
mod fs;
mod run;
mod workspace;

pub use env::{EnvLookup, EnvTarget, EnvVars};
pub use error::{HostError, HostResult};
pub use fs::{LocalFs, WorkspaceFs};
pub use run::{LocalRun, RunContext, WorkspaceHandle};
pub use workspace::WorkspaceDir;
