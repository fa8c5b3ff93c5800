//! Privileged proxy-certificate locator.
//!
//! Finds and reads the X.509 proxy certificate of another, already running
//! process, as that process would see it.
//!
//! # Pipeline
//!
//! 1. **Environment scanner** ([`environ`]): `X509_USER_PROXY` from the
//!    target's environment
//! 2. **Fallback**: `/tmp/x509up_u<uid>` when the scanner finds nothing
//! 3. **Namespace resolver** ([`namespace`]): the target's root and cwd
//!    as procfs paths
//! 4. **Fetcher** (`fetch`): enter the target's root, become the target,
//!    open, and undo all of it
//!
//! # Concurrency
//!
//! Effective ids, the process root and the working directory are process
//! wide. Every call that touches them runs inside one process-wide critical
//! section, shared by all `Locator` instances.

pub mod builder;
pub mod candidate;
pub mod common;
pub mod constants;
pub mod credentials;
pub mod environ;
mod fetch;
pub mod host;
pub mod namespace;
pub mod options;
mod transition;

pub use builder::LocatorBuilder;
pub use candidate::{CandidatePath, PathSource};
pub use credentials::{CapabilityProbe, probe_capabilities};
pub use host::{Host, PlatformHost};
pub use namespace::ProcessView;
pub use options::LocatorOptions;

use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard};
use proxylocate_shared::errors::{LocatorError, LocatorResult};
use proxylocate_shared::request::LookupRequest;

/// Serializes every mutation of process-global credentials and root.
static PROCESS_STATE_LOCK: Mutex<()> = parking_lot::const_mutex(());

fn critical_section() -> MutexGuard<'static, ()> {
    PROCESS_STATE_LOCK.lock()
}

/// A located proxy certificate.
#[derive(Debug)]
pub struct ProxyCertificate {
    /// Path the certificate was opened from, inside the target's context.
    pub path: CandidatePath,
    /// Full file contents.
    pub bytes: Vec<u8>,
    /// Open handle, positioned at the start of the file.
    pub file: File,
}

/// Locates proxy certificates of foreign processes.
///
/// Built through [`LocatorBuilder`]. Holds no per-request state; a single
/// instance can serve any number of callers.
pub struct Locator<H: Host = PlatformHost> {
    host: H,
    options: LocatorOptions,
    halted: AtomicBool,
}

impl<H: Host> std::fmt::Debug for Locator<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("host", &self.host.name())
            .field("options", &self.options)
            .field("halted", &self.is_halted())
            .finish()
    }
}

impl<H: Host> Locator<H> {
    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether an earlier call failed to restore process state.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> LocatorResult<()> {
        if self.is_halted() {
            return Err(LocatorError::Halted);
        }
        Ok(())
    }

    /// procfs paths for `pid`.
    pub fn process_view(&self, pid: i32) -> LocatorResult<ProcessView> {
        ProcessView::resolve(&self.options.proc_root, pid, self.options.max_path_len)
    }

    /// Read the configured variable from `pid`'s environment.
    ///
    /// `Ok(None)` when the variable is not set. Unreadable records and
    /// oversized values are errors.
    pub fn scan_environment(&self, pid: i32) -> LocatorResult<Option<CandidatePath>> {
        self.ensure_running()?;
        let view = self.process_view(pid)?;
        let _guard = critical_section();
        self.scan_locked(&view)
    }

    fn scan_locked(&self, view: &ProcessView) -> LocatorResult<Option<CandidatePath>> {
        environ::scan(
            &self.host,
            &self.halted,
            view,
            &self.options.env_var,
            self.options.max_path_len,
        )
    }

    /// Pick the path to try for `request`: the target's variable, else the
    /// fallback for the target's uid.
    pub fn locate_path(&self, request: &LookupRequest) -> LocatorResult<CandidatePath> {
        self.ensure_running()?;
        let view = self.process_view(request.pid)?;
        let _guard = critical_section();
        self.locate_locked(request, &view)
    }

    fn locate_locked(
        &self,
        request: &LookupRequest,
        view: &ProcessView,
    ) -> LocatorResult<CandidatePath> {
        match self.scan_locked(view) {
            Ok(Some(path)) => return Ok(path),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(
                    pid = request.pid,
                    error = %e,
                    "cannot take proxy path from target environment"
                );
            }
        }

        tracing::debug!(
            uid = request.uid,
            prefix = %self.options.fallback_prefix,
            "proxy not found in environment, using default location"
        );
        self.options.fallback_path(request.uid)
    }

    /// Fetch the proxy certificate of `request.pid`.
    ///
    /// Returns `Ok(None)` when no certificate is available for any
    /// recoverable reason. `Err` only when the locator has halted.
    ///
    /// If restoring the caller's root or identity fails, this does not
    /// return: the process is terminated through the host.
    pub fn fetch(&self, request: &LookupRequest) -> LocatorResult<Option<ProxyCertificate>> {
        self.ensure_running()?;
        let ident = request.ident();

        let view = match self.process_view(request.pid) {
            Ok(view) => view,
            Err(e) => {
                tracing::debug!(ident = %ident, error = %e, "cannot resolve target context");
                return Ok(None);
            }
        };

        let file = {
            let _guard = critical_section();
            // A previous holder may have halted while we waited.
            self.ensure_running()?;

            let path = match self.locate_locked(request, &view) {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!(ident = %ident, error = %e, "no usable proxy path");
                    return Ok(None);
                }
            };
            tracing::debug!(
                ident = %ident,
                path = %path,
                source = %path.source(),
                "looking for proxy"
            );

            fetch::open_as_target(&self.host, &self.halted, request, &path, &view)
                .map(|file| (path, file))
        };

        let Some((path, mut file)) = file else {
            tracing::debug!(ident = %ident, "no proxy found");
            return Ok(None);
        };

        match common::fs::read_and_rewind(&mut file) {
            Ok(bytes) => {
                tracing::debug!(ident = %ident, path = %path, len = bytes.len(), "proxy read");
                Ok(Some(ProxyCertificate { path, bytes, file }))
            }
            Err(e) => {
                tracing::warn!(ident = %ident, path = %path, error = %e, "cannot read proxy");
                Ok(None)
            }
        }
    }
}
