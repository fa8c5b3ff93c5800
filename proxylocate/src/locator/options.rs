//! Locator configuration.

use std::path::PathBuf;

use proxylocate_shared::errors::{LocatorError, LocatorResult};
use serde::{Deserialize, Serialize};

use super::candidate::CandidatePath;
use super::constants::{envs, paths};

/// Tunables for a [`Locator`](super::Locator).
///
/// Every field has a default matching the conventions of grid tooling, so
/// a JSON document only needs the fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorOptions {
    /// Variable read from the target's environment.
    pub env_var: String,
    /// Fallback path prefix; the target's uid is appended.
    pub fallback_prefix: String,
    /// procfs mount used to reach the target.
    pub proc_root: PathBuf,
    /// Bound on every path, NUL included.
    pub max_path_len: usize,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            env_var: envs::X509_USER_PROXY.to_string(),
            fallback_prefix: paths::FALLBACK_PREFIX.to_string(),
            proc_root: PathBuf::from(paths::PROC_ROOT),
            max_path_len: paths::MAX_PATH_LEN,
        }
    }
}

impl LocatorOptions {
    pub fn validate(&self) -> LocatorResult<()> {
        if self.env_var.is_empty() {
            return Err(LocatorError::Config("env_var must not be empty".to_string()));
        }
        if self.env_var.contains(['=', '\0']) {
            return Err(LocatorError::Config(format!(
                "env_var {:?} must not contain '=' or NUL",
                self.env_var
            )));
        }
        if self.max_path_len == 0 {
            return Err(LocatorError::Config(
                "max_path_len must be positive".to_string(),
            ));
        }
        if !self.proc_root.is_absolute() {
            return Err(LocatorError::Config(format!(
                "proc_root {} must be absolute",
                self.proc_root.display()
            )));
        }
        Ok(())
    }

    /// Fallback candidate for `uid`.
    pub fn fallback_path(&self, uid: u32) -> LocatorResult<CandidatePath> {
        CandidatePath::fallback(&self.fallback_prefix, uid, self.max_path_len)
    }
}
