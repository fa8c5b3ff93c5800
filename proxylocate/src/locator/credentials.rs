//! Effective-identity handling.
//!
//! The locator runs with a saved-set root uid and an unprivileged effective
//! uid. It raises the effective uid to 0 only for as long as a step needs it
//! and always returns to the identity captured in a [`PrivilegeSnapshot`].
//!
//! Group ids must change while the effective uid still allows it: gid
//! before uid when dropping, gid before uid when restoring (the restore runs
//! with effective uid 0).

use std::io;

use super::constants::ROOT_UID;
use super::host::Host;

/// Caller's effective identity before any change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PrivilegeSnapshot {
    pub euid: u32,
    pub egid: u32,
}

impl PrivilegeSnapshot {
    pub fn capture<H: Host>(host: &H) -> Self {
        Self {
            euid: host.geteuid(),
            egid: host.getegid(),
        }
    }

    /// Put the captured identity back. Restoring an unchanged identity is a
    /// no-op at the kernel level.
    pub fn restore<H: Host>(&self, host: &H) -> io::Result<()> {
        host.setegid(self.egid)?;
        host.seteuid(self.euid)
    }
}

/// Raise the effective uid to root.
///
/// Failure is expected when the locator runs without a saved-set root uid;
/// later steps degrade on their own, so this only logs.
pub(crate) fn escalate<H: Host>(host: &H) -> bool {
    match host.seteuid(ROOT_UID) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(
                host = host.name(),
                error = %e,
                "cannot raise effective uid to root, continuing unprivileged"
            );
            false
        }
    }
}

/// Switch to the target identity, gid first.
///
/// A failed switch is tolerated only when the effective id already equals
/// the requested one, so the file is never opened under a different
/// identity than the target's.
pub(crate) fn switch_identity<H: Host>(host: &H, uid: u32, gid: u32) -> io::Result<()> {
    if let Err(e) = host.setegid(gid)
        && host.getegid() != gid
    {
        return Err(e);
    }
    if let Err(e) = host.seteuid(uid)
        && host.geteuid() != uid
    {
        return Err(e);
    }
    Ok(())
}

/// Classify a failed `chroot(2)`.
///
/// `EPERM` means the caller lacks `CAP_SYS_CHROOT` (typical when running
/// unprivileged) and `ENOENT`/`ESRCH` that the target vanished; both are
/// expected. Anything else is logged louder. Returns the errno.
pub(crate) fn check_chroot_errno(error: &io::Error) -> i32 {
    let errno = error.raw_os_error().unwrap_or(0);
    match errno {
        libc::EPERM | libc::ENOENT | libc::ESRCH => {
            tracing::debug!(
                errno,
                message = %error,
                "chroot into target root unavailable"
            );
        }
        _ => {
            tracing::warn!(
                errno,
                message = %error,
                "chroot into target root failed with unexpected errno"
            );
        }
    }
    errno
}

/// Capabilities the locator relies on, from the permitted set.
///
/// The permitted set is what `seteuid(0)` brings back into the effective
/// set, so it answers "will the privileged steps work" without changing
/// any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct CapabilityProbe {
    pub chroot: bool,
    pub setuid: bool,
    pub setgid: bool,
}

impl CapabilityProbe {
    /// Whether the namespace crossing can happen at all.
    pub fn can_enter_namespace(&self) -> bool {
        self.chroot
    }

    /// Whether the file can be opened as an arbitrary target identity.
    pub fn can_switch_identity(&self) -> bool {
        self.setuid && self.setgid
    }
}

/// Probe the permitted capability set of the calling thread.
#[cfg(target_os = "linux")]
pub fn probe_capabilities() -> CapabilityProbe {
    use caps::{CapSet, Capability};

    let has = |cap: Capability| match caps::has_cap(None, CapSet::Permitted, cap) {
        Ok(present) => present,
        Err(e) => {
            tracing::debug!(capability = %cap, error = %e, "capability probe failed");
            false
        }
    };

    CapabilityProbe {
        chroot: has(Capability::CAP_SYS_CHROOT),
        setuid: has(Capability::CAP_SETUID),
        setgid: has(Capability::CAP_SETGID),
    }
}

#[cfg(not(target_os = "linux"))]
pub fn probe_capabilities() -> CapabilityProbe {
    CapabilityProbe::default()
}
