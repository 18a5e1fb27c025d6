//! Read and write access to a run's environment.

use std::collections::{BTreeMap, HashMap};

/// Read-only view of an environment, used for existence checks.
pub trait EnvLookup {
    fn var(&self, key: &str) -> Option<&str>;

    fn contains_var(&self, key: &str) -> bool {
        self.var(key).is_some()
    }
}

/// An environment the host lets us write into.
pub trait EnvTarget: EnvLookup {
    fn put_var(&mut self, key: String, value: String);
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl EnvTarget for HashMap<String, String> {
    fn put_var(&mut self, key: String, value: String) {
        self.insert(key, value);
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl EnvTarget for BTreeMap<String, String> {
    fn put_var(&mut self, key: String, value: String) {
        self.insert(key, value);
    }
}

/// Ordered environment map for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: BTreeMap<String, String>,
}

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    ///
    /// Names and values that are not valid UTF-8 are converted lossily, so
    /// every set variable is still present for existence checks.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.vars
    }
}

impl FromIterator<(String, String)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl EnvLookup for EnvVars {
    fn var(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl EnvTarget for EnvVars {
    fn put_var(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }
}
