//! Decisions produced for message-derived variables.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RedirectError;

/// The one key whose value goes to a file instead of the environment.
pub const CI_MESSAGE: &str = "CI_MESSAGE";

/// Variable pointing at the file that holds the `CI_MESSAGE` value.
pub const CI_MESSAGE_FILE: &str = "CI_MESSAGE_FILE";

/// File written directly under the run's workspace.
pub const CI_MESSAGE_FILE_NAME: &str = ".ci_message.txt";

/// Subdirectory of a pipeline run's root directory used as its workspace.
pub const DEFAULT_WORKSPACE_SUBDIR: &str = "workspace";

/// Why a candidate variable was left out of the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ReservedByJobParameter,
    AlreadySetInEnvironment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ReservedByJobParameter => write!(f, "reserved by job parameter"),
            SkipReason::AlreadySetInEnvironment => write!(f, "already set in environment"),
        }
    }
}

/// What to do with a single candidate variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decision {
    Skip {
        name: String,
        reason: SkipReason,
    },
    InjectEnv {
        name: String,
        value: String,
    },
    RedirectToFile {
        name: String,
        value: String,
        pointer_name: String,
        file_name: String,
    },
}

impl Decision {
    /// Redirect decision for a `CI_MESSAGE` value.
    pub fn redirect(value: impl Into<String>) -> Self {
        Decision::RedirectToFile {
            name: CI_MESSAGE.to_string(),
            value: value.into(),
            pointer_name: CI_MESSAGE_FILE.to_string(),
            file_name: CI_MESSAGE_FILE_NAME.to_string(),
        }
    }

    /// Name of the candidate this decision is about.
    pub fn name(&self) -> &str {
        match self {
            Decision::Skip { name, .. }
            | Decision::InjectEnv { name, .. }
            | Decision::RedirectToFile { name, .. } => name,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Decision::Skip { .. })
    }
}

/// Result of writing a value to the workspace file.
#[derive(Debug)]
pub enum RedirectOutcome {
    Success {
        pointer_name: String,
        path: String,
    },
    Failure {
        cause: RedirectError,
    },
}

impl RedirectOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RedirectOutcome::Success { .. })
    }
}

/// Names already defined as job parameters.
///
/// Immutable once built; a missing parameter list yields an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedNames(BTreeSet<String>);

impl ReservedNames {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_params<I, S>(params: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        params.map(|p| p.into_iter().collect()).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReservedNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
