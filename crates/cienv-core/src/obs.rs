//! Structured observability hooks for environment contribution.
//!
//! This module provides:
//! - A run-scoped tracing span via the `ContributionSpan` RAII guard
//! - Emission functions for decisions, redirects, fallbacks and verification
//!
//! Message content is never logged; redirect events carry its byte length
//! and SHA-256 instead.

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::decision::Decision;
use crate::error::RedirectError;

/// RAII guard that enters a span tagged with the run being contributed to.
pub struct ContributionSpan {
    _span: tracing::span::EnteredSpan,
}

impl ContributionSpan {
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("cienv.contribute", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Hex SHA-256 of `value`, for correlating a message without logging it.
pub fn content_digest(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Emit event: one classification decision.
pub fn emit_decision(decision: &Decision) {
    match decision {
        Decision::Skip { name, reason } => {
            debug!(event = "var.skipped", name = %name, reason = %reason);
        }
        Decision::InjectEnv { name, .. } => {
            debug!(event = "var.injected", name = %name);
        }
        Decision::RedirectToFile {
            name, file_name, ..
        } => {
            debug!(event = "var.redirect_planned", name = %name, file_name = %file_name);
        }
    }
}

/// Emit event: message written to the workspace file.
pub fn emit_redirect_succeeded(path: &str, value: &str) {
    info!(
        event = "message.redirected",
        path = %path,
        bytes = value.len(),
        sha256 = %content_digest(value),
    );
}

/// Emit event: redirect failed, fallback about to apply.
pub fn emit_redirect_failed(cause: &RedirectError, value: &str) {
    warn!(
        event = "message.redirect_failed",
        error = %cause,
        bytes = value.len(),
    );
}

/// Emit event: original value injected into the environment.
pub fn emit_fallback_injected(name: &str, value: &str) {
    info!(event = "message.fallback_injected", name = %name, bytes = value.len());
}

/// Emit event: post-write check. Advisory only.
pub fn emit_verification(path: &str, expected: u64, actual: Option<u64>) {
    match actual {
        Some(size) if size == expected => {
            debug!(event = "message.verified", path = %path, bytes = size);
        }
        Some(size) => {
            warn!(
                event = "message.size_mismatch",
                path = %path,
                expected = expected,
                actual = size,
            );
        }
        None => {
            warn!(event = "message.missing_after_write", path = %path);
        }
    }
}

/// Emit event: post-write check could not run.
pub fn emit_verification_error(path: &str, error: &dyn std::fmt::Display) {
    warn!(event = "message.verify_failed", path = %path, error = %error);
}
