//! Constants for the proxy locator
//!
//! Centralized location for the well-known names and paths the locator
//! relies on. All of them can be overridden through
//! [`LocatorOptions`](super::options::LocatorOptions).

/// Environment variables read from the target process.
pub mod envs {
    /// Points at the user's proxy certificate.
    pub const X509_USER_PROXY: &str = "X509_USER_PROXY";
}

/// Filesystem conventions
pub mod paths {
    /// Proxy location used when the target does not set `X509_USER_PROXY`.
    /// The target's numeric uid is appended.
    pub const FALLBACK_PREFIX: &str = "/tmp/x509up_u";

    /// procfs mount point used to introspect other processes.
    pub const PROC_ROOT: &str = "/proc";

    /// Bound on every path the locator builds, including the terminating NUL.
    pub const MAX_PATH_LEN: usize = libc::PATH_MAX as usize;
}

/// Per-process entries below `/proc/<pid>/`
pub mod proc_entries {
    pub const ENVIRON: &str = "environ";
    pub const ROOT: &str = "root";
    pub const CWD: &str = "cwd";
}

/// Effective uid of the superuser.
pub const ROOT_UID: u32 = 0;
