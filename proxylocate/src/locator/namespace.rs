//! Paths that expose a foreign process's container context.
//!
//! The kernel publishes another process's apparent root and working
//! directory as magic links under procfs. Entering them with `chdir` +
//! `chroot` makes path lookups resolve the way they would inside the target.

use std::path::{Path, PathBuf};

use proxylocate_shared::errors::LocatorResult;

use super::candidate::bounded_path;
use super::constants::proc_entries;

/// procfs view of a single process, as paths in the caller's namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessView {
    /// `<proc>/<pid>/environ`
    pub environ: PathBuf,
    /// `<proc>/<pid>/root`
    pub root: PathBuf,
    /// `<proc>/<pid>/cwd`
    pub cwd: PathBuf,
}

impl ProcessView {
    /// Format the procfs paths for `pid`. Fails only when a path would not
    /// fit `max_len`.
    pub fn resolve(proc_root: &Path, pid: i32, max_len: usize) -> LocatorResult<Self> {
        let dir = proc_root.join(pid.to_string());
        let entry = |name: &str| bounded_path(dir.join(name), max_len);

        Ok(Self {
            environ: entry(proc_entries::ENVIRON)?,
            root: entry(proc_entries::ROOT)?,
            cwd: entry(proc_entries::CWD)?,
        })
    }
}
