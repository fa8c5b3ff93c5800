//! Types shared between the proxy-certificate locator and the authorization
//! engine that drives it.

pub mod errors;
pub mod request;

pub use errors::{LocatorError, LocatorResult};
pub use request::LookupRequest;
