//! Show the proxy path a process advertises in its environment.

use crate::cli::{GlobalFlags, TargetFlags};
use crate::util;
use clap::Args;
use proxylocate::LocatorError;

#[derive(Args, Debug)]
pub struct EnvArgs {
    #[command(flatten)]
    pub target: TargetFlags,
}

pub fn execute(args: EnvArgs, global: &GlobalFlags) -> anyhow::Result<u8> {
    let locator = global.create_locator()?;
    let pid = args.target.pid();
    let options = locator.options();

    // Resolver errors are real errors; only scanner failures fall back.
    locator.process_view(pid)?;

    let reason = match locator.scan_environment(pid) {
        Ok(Some(path)) => {
            println!("{}", path);
            return Ok(util::EXIT_FOUND);
        }
        Ok(None) => format!("{} is not set for pid {}", options.env_var, pid),
        Err(e @ (LocatorError::PathTooLong { .. } | LocatorError::EnvironUnreadable(_))) => {
            format!("cannot take {} from pid {}: {}", options.env_var, pid, e)
        }
        Err(e) => return Err(e.into()),
    };

    let fallback = options.fallback_path(args.target.uid())?;
    eprintln!("{}, the default location would be used", reason);
    println!("{}", fallback);
    Ok(util::EXIT_NOT_FOUND)
}
