//! Linux host implementation.
//!
//! Thin wrappers over the credential and filesystem syscalls:
//! - Effective ids via `seteuid(2)`/`setegid(2)` (nix)
//! - Root changes via `chroot(2)` and `fchdir(2)` on saved directory handles
//! - Foreign process context via procfs (`/proc/<pid>/{environ,root,cwd}`)
//!
//! No call here retries or logs on success; callers decide what a failure
//! means.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use nix::unistd::{self, Gid, Uid};

use super::Host;

/// Host backed by the running Linux kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxHost;

impl LinuxHost {
    pub fn new() -> Self {
        Self
    }
}

impl Host for LinuxHost {
    fn geteuid(&self) -> u32 {
        unistd::geteuid().as_raw()
    }

    fn getegid(&self) -> u32 {
        unistd::getegid().as_raw()
    }

    fn seteuid(&self, uid: u32) -> io::Result<()> {
        unistd::seteuid(Uid::from_raw(uid)).map_err(io::Error::from)
    }

    fn setegid(&self, gid: u32) -> io::Result<()> {
        unistd::setegid(Gid::from_raw(gid)).map_err(io::Error::from)
    }

    fn open_dir(&self, path: &Path) -> io::Result<OwnedFd> {
        // O_PATH needs search permission only, so a cwd the caller cannot
        // list still yields a handle usable by fchdir(2).
        let dir = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_PATH | libc::O_DIRECTORY | libc::O_CLOEXEC)
            .open(path)?;
        Ok(OwnedFd::from(dir))
    }

    fn chdir(&self, path: &Path) -> io::Result<()> {
        unistd::chdir(path).map_err(io::Error::from)
    }

    fn fchdir(&self, dir: BorrowedFd<'_>) -> io::Result<()> {
        // SAFETY: the descriptor is borrowed from a live OwnedFd.
        if unsafe { libc::fchdir(dir.as_raw_fd()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn chroot(&self, path: &Path) -> io::Result<()> {
        unistd::chroot(path).map_err(io::Error::from)
    }

    fn open_read(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn terminate(&self, reason: &str) -> ! {
        tracing::error!(reason, "process state is unrecoverable, aborting");
        std::process::abort()
    }

    fn name(&self) -> &'static str {
        "linux"
    }
}
