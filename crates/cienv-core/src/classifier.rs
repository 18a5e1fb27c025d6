//! Per-variable classification: skip, inject, or redirect to a file.

use cienv_host::EnvLookup;

use crate::decision::{Decision, ReservedNames, SkipReason, CI_MESSAGE};

/// Decide what to do with each candidate variable.
///
/// Reserved names win over the environment, and both win over the
/// `CI_MESSAGE` redirect. Produces exactly one decision per candidate, in
/// candidate order. Pure: `env` is only read.
pub fn classify<'a, I, E>(candidates: I, reserved: &ReservedNames, env: &E) -> Vec<Decision>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
    E: EnvLookup + ?Sized,
{
    candidates
        .into_iter()
        .map(|(name, value)| classify_one(name, value, reserved, env))
        .collect()
}

fn classify_one<E>(name: &str, value: &str, reserved: &ReservedNames, env: &E) -> Decision
where
    E: EnvLookup + ?Sized,
{
    if reserved.contains(name) {
        Decision::Skip {
            name: name.to_string(),
            reason: SkipReason::ReservedByJobParameter,
        }
    } else if env.contains_var(name) {
        Decision::Skip {
            name: name.to_string(),
            reason: SkipReason::AlreadySetInEnvironment,
        }
    } else if name == CI_MESSAGE {
        Decision::redirect(value)
    } else {
        Decision::InjectEnv {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}
