//! Saved directory handles for undoing a root change.
//!
//! A `chroot(2)` cannot be reversed by path: once the root has moved, the
//! old root is no longer nameable. Descriptors opened before the change
//! still refer to the old directories, so `fchdir(old_root)` followed by
//! `chroot(".")` puts the root back, and `fchdir(old_cwd)` the working
//! directory.

use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::path::Path;

use crate::locator::host::Host;

/// The caller's root and working directory, held open for one fetch.
///
/// Both descriptors are closed when this is dropped.
#[derive(Debug)]
pub struct NamespaceContext {
    root: OwnedFd,
    cwd: OwnedFd,
}

impl NamespaceContext {
    /// Open `/` and `.` as seen by the caller right now.
    ///
    /// Must run before any root or working-directory change.
    pub fn capture<H: Host>(host: &H) -> io::Result<Self> {
        let root = host.open_dir(Path::new("/"))?;
        let cwd = host.open_dir(Path::new("."))?;
        Ok(Self { root, cwd })
    }

    pub fn root(&self) -> BorrowedFd<'_> {
        self.root.as_fd()
    }

    pub fn cwd(&self) -> BorrowedFd<'_> {
        self.cwd.as_fd()
    }
}
