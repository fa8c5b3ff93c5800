//! Lookup request handed to the locator by the authorization engine.

use serde::{Deserialize, Serialize};

/// Identifies the process whose proxy certificate should be fetched.
///
/// Immutable for the duration of one lookup. `uid`/`gid` are the identity the
/// certificate file is opened as; `identity_label` is only used in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub pid: i32,
    pub uid: u32,
    pub gid: u32,
    #[serde(default)]
    pub identity_label: String,
}

impl LookupRequest {
    pub fn new(pid: i32, uid: u32, gid: u32, identity_label: impl Into<String>) -> Self {
        Self {
            pid,
            uid,
            gid,
            identity_label: identity_label.into(),
        }
    }

    /// Label for diagnostics. Falls back to the numeric identity when no
    /// label was supplied.
    pub fn ident(&self) -> String {
        if self.identity_label.is_empty() {
            format!("pid={} uid={} gid={}", self.pid, self.uid, self.gid)
        } else {
            self.identity_label.clone()
        }
    }
}
