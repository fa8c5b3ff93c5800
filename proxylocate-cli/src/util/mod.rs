//! Utility functions shared across commands

use nix::unistd::{getegid, geteuid, getpid};

/// A certificate was found and printed.
pub const EXIT_FOUND: u8 = 0;
/// Nothing was found; not an error.
pub const EXIT_NOT_FOUND: u8 = 1;
/// The command itself failed.
pub const EXIT_ERROR: u8 = 2;

/// Pid and effective ids of this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub pid: i32,
    pub uid: u32,
    pub gid: u32,
}

pub fn caller_identity() -> CallerIdentity {
    CallerIdentity {
        pid: getpid().as_raw(),
        uid: geteuid().as_raw(),
        gid: getegid().as_raw(),
    }
}

/// Convert a lookup outcome to a shell exit code.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(to_shell_exit_code(true), 0);   // Found
/// assert_eq!(to_shell_exit_code(false), 1);  // Not found
/// ```
pub fn to_shell_exit_code(found: bool) -> u8 {
    if found { EXIT_FOUND } else { EXIT_NOT_FOUND }
}
