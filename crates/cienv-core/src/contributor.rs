//! Contributes message-derived variables to a run's environment.

use std::collections::BTreeMap;

use cienv_host::{EnvTarget, RunContext};
use serde::Serialize;
use tracing::warn;

use crate::classifier::classify;
use crate::config::ContributorConfig;
use crate::decision::{Decision, RedirectOutcome, ReservedNames, SkipReason};
use crate::error::RedirectError;
use crate::obs::{self, ContributionSpan};
use crate::redirect::Redirector;

/// How the `CI_MESSAGE` value reached the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MessageDelivery {
    /// Written to a file; `CI_MESSAGE_FILE` points at it.
    File { path: String },
    /// Injected directly as `CI_MESSAGE` after the redirect failed.
    Fallback { cause: String },
    /// Injected directly because redirection is disabled.
    Direct,
}

/// What one contribution pass did to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContributionReport {
    /// Names written into the environment, in write order.
    pub injected: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
    pub message: Option<MessageDelivery>,
}

impl ContributionReport {
    /// Nothing was contributed.
    pub fn is_noop(&self) -> bool {
        self.injected.is_empty() && self.skipped.is_empty() && self.message.is_none()
    }
}

/// A redirect decision held back until plain injections are applied.
#[derive(Debug)]
struct PendingRedirect {
    name: String,
    value: String,
    pointer_name: String,
    file_name: String,
}

/// Environment-contributing action built from one inbound CI message.
#[derive(Debug, Clone)]
pub struct EnvContributor {
    message_params: Option<BTreeMap<String, String>>,
    job_params: ReservedNames,
    redirector: Redirector,
    config: ContributorConfig,
}

impl EnvContributor {
    /// Build from message variables and the job's parameter names. A
    /// missing parameter list reserves nothing.
    pub fn new<I, S>(message_params: Option<BTreeMap<String, String>>, job_params: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message_params,
            job_params: ReservedNames::from_params(job_params),
            redirector: Redirector::default(),
            config: ContributorConfig::default(),
        }
    }

    /// Message variables only, no job parameters.
    pub fn from_message(message_params: BTreeMap<String, String>) -> Self {
        Self::new(Some(message_params), None::<Vec<String>>)
    }

    pub fn with_config(mut self, config: ContributorConfig) -> Self {
        self.redirector = Redirector::new(config.clone());
        self.config = config;
        self
    }

    pub fn reserved(&self) -> &ReservedNames {
        &self.job_params
    }

    /// Add this message's variables to `env`.
    ///
    /// Missing params or a missing environment is a no-op. Never fails:
    /// if the message cannot go to a file it lands in `CI_MESSAGE`.
    pub async fn contribute<E>(&self, run: &dyn RunContext, env: Option<&mut E>) -> ContributionReport
    where
        E: EnvTarget + ?Sized,
    {
        let (Some(params), Some(env)) = (self.message_params.as_ref(), env) else {
            return ContributionReport::default();
        };

        let _span = ContributionSpan::enter(run.run_id());
        let decisions = classify(params, &self.job_params, &*env);

        let mut report = ContributionReport::default();
        let mut pending_message = None;

        for decision in decisions {
            obs::emit_decision(&decision);
            match decision {
                Decision::Skip { name, reason } => report.skipped.push((name, reason)),
                Decision::InjectEnv { name, value } => {
                    env.put_var(name.clone(), value);
                    report.injected.push(name);
                }
                Decision::RedirectToFile {
                    name,
                    value,
                    pointer_name,
                    file_name,
                } => {
                    pending_message = Some(PendingRedirect {
                        name,
                        value,
                        pointer_name,
                        file_name,
                    });
                }
            }
        }

        // Runs after the plain injections so the pointer check sees them.
        if let Some(pending) = pending_message {
            let pointer_name = pending.pointer_name.clone();
            let name = pending.name.clone();
            let delivery = self.deliver_message(run, env, pending).await;
            report.injected.push(match &delivery {
                MessageDelivery::File { .. } => pointer_name,
                _ => name,
            });
            report.message = Some(delivery);
        }

        report
    }

    async fn deliver_message<E>(
        &self,
        run: &dyn RunContext,
        env: &mut E,
        pending: PendingRedirect,
    ) -> MessageDelivery
    where
        E: EnvTarget + ?Sized,
    {
        let PendingRedirect {
            name,
            value,
            pointer_name,
            file_name,
        } = pending;

        if !self.config.redirect_enabled {
            env.put_var(name, value);
            return MessageDelivery::Direct;
        }

        let outcome =
            if self.job_params.contains(&pointer_name) || env.contains_var(&pointer_name) {
                warn!(
                    event = "message.pointer_unavailable",
                    pointer = %pointer_name,
                    "pointer variable taken, skipping file redirect"
                );
                RedirectOutcome::Failure {
                    cause: RedirectError::PointerUnavailable { name: pointer_name },
                }
            } else {
                self.redirector
                    .redirect_to(run, &pointer_name, &file_name, &value)
                    .await
            };

        match outcome {
            RedirectOutcome::Success { pointer_name, path } => {
                env.put_var(pointer_name, path.clone());
                MessageDelivery::File { path }
            }
            RedirectOutcome::Failure { cause } => {
                obs::emit_fallback_injected(&name, &value);
                env.put_var(name, value);
                MessageDelivery::Fallback {
                    cause: cause.to_string(),
                }
            }
        }
    }
}
