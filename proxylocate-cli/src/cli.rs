use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use proxylocate::{Locator, LocatorBuilder, LocatorOptions};

use crate::commands::{env::EnvArgs, fetch::FetchArgs, paths::PathsArgs, probe::ProbeArgs};
use crate::util;

/// Locate and read the X.509 proxy certificate of a process
#[derive(Parser, Debug)]
#[command(name = "proxylocate", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the proxy certificate of a process
    Fetch(FetchArgs),
    /// Show the proxy path set in a process's environment
    Env(EnvArgs),
    /// Show the procfs paths used for a process
    Paths(PathsArgs),
    /// Show which privileges this process holds
    Probe(ProbeArgs),
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Default)]
pub struct GlobalFlags {
    /// JSON file with locator options
    #[arg(long, global = true, env = "PROXYLOCATE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Environment variable to read from the target
    #[arg(long, global = true, value_name = "NAME")]
    pub env_var: Option<String>,

    /// procfs mount point
    #[arg(long, global = true, value_name = "DIR")]
    pub proc_root: Option<PathBuf>,
}

impl GlobalFlags {
    /// Options from the config file (if any) with command-line overrides applied.
    pub fn resolve_options(&self) -> anyhow::Result<LocatorOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => LocatorOptions::default(),
        };

        if let Some(env_var) = &self.env_var {
            options.env_var = env_var.clone();
        }
        if let Some(proc_root) = &self.proc_root {
            options.proc_root = proc_root.clone();
        }
        tracing::debug!(
            config = ?self.config,
            env_var = %options.env_var,
            proc_root = %options.proc_root.display(),
            fallback_prefix = %options.fallback_prefix,
            "resolved locator options"
        );
        Ok(options)
    }

    pub fn create_locator(&self) -> anyhow::Result<Locator> {
        let options = self.resolve_options()?;
        Ok(LocatorBuilder::new().with_options(options).build()?)
    }
}

/// Which process to look at, and as whom.
///
/// Every field defaults to this process and its effective ids.
#[derive(Args, Debug, Default)]
pub struct TargetFlags {
    /// Target process id
    #[arg(short = 'p', long)]
    pub pid: Option<i32>,

    /// Uid to open the proxy as
    #[arg(short = 'u', long)]
    pub uid: Option<u32>,

    /// Gid to open the proxy as
    #[arg(short = 'g', long)]
    pub gid: Option<u32>,
}

impl TargetFlags {
    pub fn pid(&self) -> i32 {
        self.pid.unwrap_or_else(|| util::caller_identity().pid)
    }

    pub fn uid(&self) -> u32 {
        self.uid.unwrap_or_else(|| util::caller_identity().uid)
    }

    pub fn gid(&self) -> u32 {
        self.gid.unwrap_or_else(|| util::caller_identity().gid)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Certificate bytes as stored
    #[default]
    Raw,
    /// JSON object with path and contents
    Json,
}
