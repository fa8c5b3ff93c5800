//! Report which privileges the locator can use.

use crate::util;
use clap::Args;
use proxylocate::locator::probe_capabilities;

#[derive(Args, Debug)]
pub struct ProbeArgs {}

pub fn execute(_args: ProbeArgs) -> anyhow::Result<u8> {
    let caps = probe_capabilities();
    let me = util::caller_identity();

    let report = serde_json::json!({
        "euid": me.uid,
        "egid": me.gid,
        "chroot": caps.chroot,
        "setuid": caps.setuid,
        "setgid": caps.setgid,
        "can_enter_namespace": caps.can_enter_namespace(),
        "can_switch_identity": caps.can_switch_identity(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(util::EXIT_FOUND)
}
