//! Environment scanner.
//!
//! Reads a foreign process's environment record (`/proc/<pid>/environ`) and
//! extracts one variable from it. The record is a flat sequence of
//! `KEY=VALUE` entries, each terminated by a NUL byte. The record belongs to
//! another user and is attacker-influenced: values are length-checked
//! against the path bound and otherwise treated as opaque bytes.

use std::sync::atomic::AtomicBool;

use proxylocate_shared::errors::{LocatorError, LocatorResult};

use super::candidate::{CandidatePath, PathSource};
use super::credentials;
use super::host::Host;
use super::namespace::ProcessView;
use super::transition::{Undo, UndoStack};

/// Look up `key` in a NUL-separated environment record.
///
/// * Exact key match; the first occurrence wins.
/// * An entry cut off by the end of the record (no trailing NUL) is ignored.
/// * A value that does not fit `max_len` is an error, never truncated.
///
/// Returns `Ok(None)` when the key is absent.
pub fn parse_environ(
    record: &[u8],
    key: &str,
    max_len: usize,
) -> LocatorResult<Option<CandidatePath>> {
    // Everything up to the last NUL consists of complete entries.
    let Some(end) = record.iter().rposition(|&b| b == 0) else {
        return Ok(None);
    };

    for entry in record[..end].split(|&b| b == 0) {
        let Some(eq) = entry.iter().position(|&b| b == b'=') else {
            continue;
        };
        if &entry[..eq] == key.as_bytes() {
            let value = &entry[eq + 1..];
            return CandidatePath::from_bytes(value, max_len, PathSource::Environment).map(Some);
        }
    }
    Ok(None)
}

/// Read `key` from the target's environment.
///
/// The record is read with effective uid 0 when that can be acquired; the
/// prior effective uid is back in place before this returns. An unreadable
/// record is reported as [`LocatorError::EnvironUnreadable`].
pub(crate) fn scan<H: Host>(
    host: &H,
    halted: &AtomicBool,
    view: &ProcessView,
    key: &str,
    max_len: usize,
) -> LocatorResult<Option<CandidatePath>> {
    let record = {
        let prior = host.geteuid();
        let mut undo = UndoStack::new(host, halted);
        if credentials::escalate(host) {
            undo.push(Undo::EffectiveUid(prior));
        }
        let record = host.read_all(&view.environ);
        undo.unwind();
        record
    };

    let record = record.map_err(|e| {
        LocatorError::EnvironUnreadable(format!("{}: {}", view.environ.display(), e))
    })?;

    let found = parse_environ(&record, key, max_len)?;
    if found.is_none() {
        tracing::debug!(environ = %view.environ.display(), key, "variable not set in target environment");
    }
    Ok(found)
}
