//! Host abstraction for process-global credential and filesystem state.
//!
//! This module provides the [`Host`] trait: the only path through which the
//! locator touches effective ids, the process root and the working
//! directory. Everything above it is generic over `H: Host`.
//!
//! # Implementations
//!
//! | Host | Platform | Mechanism |
//! |------|----------|-----------|
//! | [`LinuxHost`] | Linux | `nix`/`libc` syscalls against procfs |
//! | [`UnsupportedHost`] | other | every operation fails with `Unsupported` |

#[cfg(target_os = "linux")]
mod linux;
#[cfg(test)]
pub(crate) mod mock;

#[cfg(target_os = "linux")]
pub use linux::LinuxHost;

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{BorrowedFd, OwnedFd};
use std::path::Path;

// ============================================================================
// Host Trait
// ============================================================================

/// Process-global operations the locator needs.
///
/// Effective ids, root and cwd are shared by every thread of the process.
/// Callers must hold the locator's critical section around any sequence of
/// mutating calls.
pub trait Host: Send + Sync {
    fn geteuid(&self) -> u32;

    fn getegid(&self) -> u32;

    fn seteuid(&self, uid: u32) -> io::Result<()>;

    fn setegid(&self, gid: u32) -> io::Result<()>;

    /// Open a directory handle that survives later root changes.
    fn open_dir(&self, path: &Path) -> io::Result<OwnedFd>;

    fn chdir(&self, path: &Path) -> io::Result<()>;

    fn fchdir(&self, dir: BorrowedFd<'_>) -> io::Result<()>;

    fn chroot(&self, path: &Path) -> io::Result<()>;

    /// Open a file read-only under the current identity and root.
    fn open_read(&self, path: &Path) -> io::Result<File>;

    /// Read a whole file under the current identity and root.
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut file = self.open_read(path)?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Stop the process. Called when the process root or identity could not
    /// be restored and no further filesystem access can be trusted.
    fn terminate(&self, reason: &str) -> !;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

// ============================================================================
// PlatformHost type alias: single #[cfg] dispatch point
// ============================================================================

/// The host for the current platform.
#[cfg(target_os = "linux")]
pub type PlatformHost = LinuxHost;

#[cfg(not(target_os = "linux"))]
pub type PlatformHost = UnsupportedHost;

// ============================================================================
// UnsupportedHost: platforms without procfs
// ============================================================================

/// Host for platforms without a procfs view of foreign processes.
///
/// Reports the real effective ids but refuses every other operation, so a
/// locator built on it always answers "no certificate".
#[derive(Debug)]
pub struct UnsupportedHost;

impl UnsupportedHost {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnsupportedHost {
    fn default() -> Self {
        Self::new()
    }
}

fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "foreign process introspection is not supported on this platform",
    )
}

impl Host for UnsupportedHost {
    fn geteuid(&self) -> u32 {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() }
    }

    fn getegid(&self) -> u32 {
        // SAFETY: getegid has no preconditions and cannot fail.
        unsafe { libc::getegid() }
    }

    fn seteuid(&self, _uid: u32) -> io::Result<()> {
        Err(unsupported())
    }

    fn setegid(&self, _gid: u32) -> io::Result<()> {
        Err(unsupported())
    }

    fn open_dir(&self, _path: &Path) -> io::Result<OwnedFd> {
        Err(unsupported())
    }

    fn chdir(&self, _path: &Path) -> io::Result<()> {
        Err(unsupported())
    }

    fn fchdir(&self, _dir: BorrowedFd<'_>) -> io::Result<()> {
        Err(unsupported())
    }

    fn chroot(&self, _path: &Path) -> io::Result<()> {
        Err(unsupported())
    }

    fn open_read(&self, _path: &Path) -> io::Result<File> {
        Err(unsupported())
    }

    fn terminate(&self, reason: &str) -> ! {
        tracing::error!(reason, "terminating process");
        std::process::abort()
    }

    fn name(&self) -> &'static str {
        "unsupported"
    }
}
