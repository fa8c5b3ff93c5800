//! Bounded candidate paths.
//!
//! Every path the locator builds or reads from a foreign environment must fit
//! a fixed bound (the equivalent of a `PATH_MAX` buffer, NUL included). A
//! path that does not fit is rejected; it is never shortened.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use proxylocate_shared::errors::{LocatorError, LocatorResult};

/// Where a [`CandidatePath`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// Read from the target's environment.
    Environment,
    /// Built from the fallback template and the target's uid.
    Fallback,
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSource::Environment => f.write_str("environment"),
            PathSource::Fallback => f.write_str("fallback"),
        }
    }
}

/// A path that is guaranteed to fit the configured bound.
///
/// The bytes are opaque: nothing is decoded, normalized, or interpreted
/// beyond being handed to `open(2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    path: OsString,
    source: PathSource,
}

impl CandidatePath {
    /// Wrap raw bytes, rejecting anything that would not fit `max_len`.
    pub fn from_bytes(bytes: &[u8], max_len: usize, source: PathSource) -> LocatorResult<Self> {
        check_bound(bytes.len(), max_len)?;
        Ok(Self {
            path: OsString::from_vec(bytes.to_vec()),
            source,
        })
    }

    /// `<prefix><uid>`, e.g. `/tmp/x509up_u1000`.
    pub fn fallback(prefix: &str, uid: u32, max_len: usize) -> LocatorResult<Self> {
        let path = format!("{prefix}{uid}");
        Self::from_bytes(path.as_bytes(), max_len, PathSource::Fallback)
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.path.as_bytes()
    }

    pub fn as_os_str(&self) -> &OsStr {
        &self.path
    }

    pub fn source(&self) -> PathSource {
        self.source
    }
}

impl fmt::Display for CandidatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_path().display())
    }
}

/// Build a bounded path from already formatted text.
pub(crate) fn bounded_path(path: PathBuf, max_len: usize) -> LocatorResult<PathBuf> {
    check_bound(path.as_os_str().len(), max_len)?;
    Ok(path)
}

/// `max_len` counts the terminating NUL, so the longest accepted path is
/// `max_len - 1` bytes.
pub(crate) fn check_bound(len: usize, max_len: usize) -> LocatorResult<()> {
    if len >= max_len {
        return Err(LocatorError::PathTooLong { len, max: max_len });
    }
    Ok(())
}
