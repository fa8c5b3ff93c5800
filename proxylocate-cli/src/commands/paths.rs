//! Print the procfs paths used to reach a process.

use crate::cli::{GlobalFlags, TargetFlags};
use crate::util;
use clap::Args;

#[derive(Args, Debug)]
pub struct PathsArgs {
    #[command(flatten)]
    pub target: TargetFlags,
}

pub fn execute(args: PathsArgs, global: &GlobalFlags) -> anyhow::Result<u8> {
    let locator = global.create_locator()?;
    let view = locator.process_view(args.target.pid())?;

    println!("environ\t{}", view.environ.display());
    println!("root\t{}", view.root.display());
    println!("cwd\t{}", view.cwd.display());

    Ok(util::EXIT_FOUND)
}
