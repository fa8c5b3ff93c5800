//! Reversible process-state transitions.
//!
//! Every forward change to effective ids, root or working directory pushes
//! its inverse onto an [`UndoStack`] once the change has taken effect. The
//! stack is unwound in reverse order on every exit path, including early
//! returns (explicit [`UndoStack::unwind`]) and panics (`Drop`).
//!
//! Undoing can itself fail. Failing to re-acquire root is tolerated: the
//! following inverse will fail on its own if it needed it. Any other
//! failure leaves the process with an unknown root or identity; the stack
//! then marks the locator halted and terminates the process through the
//! host.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use super::common::fd::NamespaceContext;
use super::constants::ROOT_UID;
use super::credentials::PrivilegeSnapshot;
use super::host::Host;

/// Inverse of one forward transition.
#[derive(Debug)]
pub(crate) enum Undo<'a> {
    /// Return the effective uid to its prior value.
    EffectiveUid(u32),
    /// Return effective gid and uid to the snapshot.
    Identity(PrivilegeSnapshot),
    /// Return the working directory to the saved `.`.
    WorkingDir(&'a NamespaceContext),
    /// Return the root to the saved `/`.
    Root(&'a NamespaceContext),
    /// Re-acquire root after dropping to the target identity.
    Reescalate,
}

impl Undo<'_> {
    fn step(&self) -> &'static str {
        match self {
            Undo::EffectiveUid(_) => "restore effective uid",
            Undo::Identity(_) => "restore identity",
            Undo::WorkingDir(_) => "restore working directory",
            Undo::Root(_) => "restore root",
            Undo::Reescalate => "re-acquire root",
        }
    }

    fn is_fatal(&self) -> bool {
        !matches!(self, Undo::Reescalate)
    }

    fn run<H: Host>(&self, host: &H) -> io::Result<()> {
        match self {
            Undo::EffectiveUid(uid) => host.seteuid(*uid),
            Undo::Identity(snapshot) => snapshot.restore(host),
            Undo::WorkingDir(ctx) => host.fchdir(ctx.cwd()),
            Undo::Root(ctx) => {
                host.fchdir(ctx.root())?;
                host.chroot(Path::new("."))
            }
            Undo::Reescalate => host.seteuid(ROOT_UID),
        }
    }
}

/// Stack of pending inverses for one locator call.
pub(crate) struct UndoStack<'a, H: Host> {
    host: &'a H,
    halted: &'a AtomicBool,
    entries: Vec<Undo<'a>>,
}

impl<'a, H: Host> UndoStack<'a, H> {
    pub fn new(host: &'a H, halted: &'a AtomicBool) -> Self {
        Self {
            host,
            halted,
            entries: Vec::new(),
        }
    }

    /// Record the inverse of a transition that has just taken effect.
    pub fn push(&mut self, undo: Undo<'a>) {
        tracing::trace!(step = undo.step(), depth = self.entries.len(), "transition recorded");
        self.entries.push(undo);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Undo only the most recent transition.
    pub fn undo_last(&mut self) {
        if let Some(undo) = self.entries.pop() {
            self.run(undo);
        }
    }

    /// Undo every pending transition, newest first.
    pub fn unwind(&mut self) {
        while let Some(undo) = self.entries.pop() {
            self.run(undo);
        }
    }

    fn run(&mut self, undo: Undo<'a>) {
        match undo.run(self.host) {
            Ok(()) => {}
            Err(e) if !undo.is_fatal() => {
                tracing::warn!(step = undo.step(), error = %e, "undo step failed, continuing");
            }
            Err(e) => {
                self.entries.clear();
                fatal(self.host, self.halted, undo.step(), &e);
            }
        }
    }
}

impl<H: Host> Drop for UndoStack<'_, H> {
    fn drop(&mut self) {
        if !self.is_empty() {
            tracing::warn!(
                pending = self.entries.len(),
                "undo stack dropped with pending transitions, unwinding"
            );
            self.unwind();
        }
    }
}

/// Halt the locator and terminate the process.
pub(crate) fn fatal<H: Host>(host: &H, halted: &AtomicBool, step: &str, error: &io::Error) -> ! {
    halted.store(true, Ordering::SeqCst);
    tracing::error!(
        host = host.name(),
        step,
        error = %error,
        "cannot restore process state"
    );
    host.terminate(&format!("{step}: {error}"))
}
