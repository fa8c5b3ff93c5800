//! Privileged file fetcher.
//!
//! Opens a candidate path as the target process would see it: relative to
//! the target's root and working directory, under the target's uid/gid.
//!
//! # Sequence
//!
//! 1. Capture the caller's identity and open handles to its `/` and `.`
//! 2. Raise the effective uid to root
//! 3. `chdir` into the target's cwd, `chroot` into the target's root
//!    (skipped, with the cwd put back, when `chroot` is not permitted)
//! 4. Drop to the target's gid, then uid
//! 5. Open the candidate read-only
//! 6. Re-acquire root, restore root and cwd, restore the caller's identity
//!
//! Steps 6 run from the undo stack, in reverse order of what actually
//! happened, on every exit path. Reading the bytes happens afterwards, with
//! the caller's own identity and root back in place.

use std::fs::File;
use std::sync::atomic::AtomicBool;

use proxylocate_shared::request::LookupRequest;

use super::candidate::CandidatePath;
use super::common::fd::NamespaceContext;
use super::credentials::{self, PrivilegeSnapshot};
use super::host::Host;
use super::namespace::ProcessView;
use super::transition::{Undo, UndoStack};

/// Open `candidate` inside the target's context as the target's identity.
///
/// Returns `None` for every recoverable failure, after logging it. A failed
/// restore does not return: the process is terminated through the host.
pub(crate) fn open_as_target<H: Host>(
    host: &H,
    halted: &AtomicBool,
    request: &LookupRequest,
    candidate: &CandidatePath,
    view: &ProcessView,
) -> Option<File> {
    let snapshot = PrivilegeSnapshot::capture(host);

    let ctx = match NamespaceContext::capture(host) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::warn!(error = %e, "cannot open handles to current root and cwd");
            return None;
        }
    };

    let mut undo = UndoStack::new(host, halted);

    // Restoring the snapshot covers both the escalation below and the later
    // switch to the target identity; it is a no-op while nothing changed.
    undo.push(Undo::Identity(snapshot));
    let escalated = credentials::escalate(host);

    let rooted = enter_namespace(host, &mut undo, &ctx, view);

    let switched = credentials::switch_identity(host, request.uid, request.gid);
    if escalated {
        undo.push(Undo::Reescalate);
    }

    let file = match switched {
        Ok(()) => match host.open_read(candidate.as_path()) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::debug!(
                    path = %candidate,
                    uid = request.uid,
                    gid = request.gid,
                    in_container = rooted,
                    error = %e,
                    "cannot open proxy certificate"
                );
                None
            }
        },
        Err(e) => {
            tracing::warn!(
                uid = request.uid,
                gid = request.gid,
                error = %e,
                "cannot switch to target identity, not opening proxy"
            );
            None
        }
    };

    undo.unwind();
    file
}

/// Move cwd and root into the target's context.
///
/// Returns whether the root changed. When the target's cwd cannot be
/// entered nothing changes; when the root cannot be changed the cwd is put
/// back and the caller continues in its own namespace.
fn enter_namespace<'a, H: Host>(
    host: &H,
    undo: &mut UndoStack<'a, H>,
    ctx: &'a NamespaceContext,
    view: &ProcessView,
) -> bool {
    if let Err(e) = host.chdir(&view.cwd) {
        tracing::debug!(
            cwd = %view.cwd.display(),
            error = %e,
            "cannot enter target cwd, reading in caller namespace"
        );
        return false;
    }
    undo.push(Undo::WorkingDir(ctx));

    match host.chroot(&view.root) {
        Ok(()) => {
            undo.push(Undo::Root(ctx));
            true
        }
        Err(e) => {
            credentials::check_chroot_errno(&e);
            tracing::info!(
                root = %view.root.display(),
                "chroot unavailable, reading in caller namespace"
            );
            undo.undo_last();
            false
        }
    }
}
