//! Locate and read the X.509 proxy certificate of another process.
//!
//! A privileged service asks for the proxy of a process by pid, uid and gid.
//! The path comes from the process's own environment (`X509_USER_PROXY`) or
//! the conventional `/tmp/x509up_u<uid>` fallback, and the file is opened
//! inside the process's root directory under the process's identity.
//!
//! ```ignore
//! use proxylocate::{LocatorBuilder, LookupRequest};
//!
//! let locator = LocatorBuilder::new().build()?;
//! let request = LookupRequest::new(pid, uid, gid, "job 17");
//! if let Some(cert) = locator.fetch(&request)? {
//!     println!("{} bytes from {}", cert.bytes.len(), cert.path);
//! }
//! ```

pub mod locator;

pub use locator::{
    CandidatePath, Locator, LocatorBuilder, LocatorOptions, PathSource, ProxyCertificate,
};
pub use proxylocate_shared::errors::{LocatorError, LocatorResult};
pub use proxylocate_shared::request::LookupRequest;
