//! File utilities for the fetcher.

use std::fs::File;
use std::io::{self, Read, Seek};

/// Read a file to the end, then rewind it.
///
/// The caller gets both the bytes and a handle positioned at offset 0, so
/// it can parse the certificate again without reopening (and without
/// needing the target's identity a second time).
///
/// # Returns
///
/// * `Ok(bytes)` - Full contents; the handle is back at the start
/// * `Err(e)` - Read or seek failed; no partial buffer is returned
pub fn read_and_rewind(file: &mut File) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    file.rewind()?;
    Ok(bytes)
}
