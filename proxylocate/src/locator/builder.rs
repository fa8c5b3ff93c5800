//! LocatorBuilder for constructing a [`Locator`](super::Locator).

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use proxylocate_shared::errors::LocatorResult;

use super::Locator;
use super::credentials::probe_capabilities;
use super::host::{Host, PlatformHost};
use super::options::LocatorOptions;

/// Builder for constructing a [`Locator`].
///
/// Uses a consuming builder pattern: each method takes ownership and returns
/// the modified builder, enabling fluent chains.
///
/// # Example
///
/// ```ignore
/// let locator = LocatorBuilder::new()
///     .with_proc_root("/host/proc")
///     .build()?;
/// let cert = locator.fetch(&request)?;
/// ```
#[derive(Debug, Clone)]
pub struct LocatorBuilder {
    options: LocatorOptions,
}

impl Default for LocatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LocatorBuilder {
    /// Create a new LocatorBuilder with default options.
    pub fn new() -> Self {
        Self {
            options: LocatorOptions::default(),
        }
    }

    /// Replace all options.
    pub fn with_options(mut self, options: LocatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the environment variable read from the target.
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.options.env_var = name.into();
        self
    }

    /// Set the fallback path prefix.
    pub fn with_fallback_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.fallback_prefix = prefix.into();
        self
    }

    /// Set the procfs mount point.
    pub fn with_proc_root(mut self, proc_root: impl Into<PathBuf>) -> Self {
        self.options.proc_root = proc_root.into();
        self
    }

    /// Build with the platform-default host.
    ///
    /// On Linux: [`LinuxHost`](super::host::LinuxHost)
    /// On other: [`UnsupportedHost`](super::host::UnsupportedHost)
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Config`](proxylocate_shared::errors::LocatorError)
    /// if the options are invalid.
    pub fn build(self) -> LocatorResult<Locator<PlatformHost>> {
        self.build_with(PlatformHost::default())
    }

    /// Build with a custom host implementation.
    ///
    /// Useful for testing or injecting alternative host behavior.
    pub fn build_with<H: Host>(self, host: H) -> LocatorResult<Locator<H>> {
        self.options.validate()?;

        let caps = probe_capabilities();
        if !caps.can_enter_namespace() || !caps.can_switch_identity() {
            tracing::info!(
                host = host.name(),
                chroot = caps.chroot,
                setuid = caps.setuid,
                setgid = caps.setgid,
                "missing capabilities, proxies are read in the caller namespace and only as the caller"
            );
        }

        Ok(Locator {
            host,
            options: self.options,
            halted: AtomicBool::new(false),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
