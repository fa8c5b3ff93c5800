//! Descriptor and file helpers shared by the scanner and the fetcher.

pub mod fd;
pub mod fs;
