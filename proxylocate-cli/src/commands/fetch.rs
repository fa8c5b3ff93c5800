//! Fetch the proxy certificate of a process.

use std::io::Write;

use crate::cli::{GlobalFlags, OutputFormat, TargetFlags};
use crate::util;
use clap::Args;
use proxylocate::{LookupRequest, ProxyCertificate};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub target: TargetFlags,

    /// Label used in log events for this lookup
    #[arg(short = 'l', long)]
    pub label: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Raw)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct CertificatePresenter<'a> {
    ident: String,
    path: String,
    source: String,
    len: usize,
    contents: std::borrow::Cow<'a, str>,
}

impl<'a> CertificatePresenter<'a> {
    fn new(request: &LookupRequest, cert: &'a ProxyCertificate) -> Self {
        Self {
            ident: request.ident(),
            path: cert.path.to_string(),
            source: cert.path.source().to_string(),
            len: cert.bytes.len(),
            contents: String::from_utf8_lossy(&cert.bytes),
        }
    }
}

pub fn execute(args: FetchArgs, global: &GlobalFlags) -> anyhow::Result<u8> {
    let locator = global.create_locator()?;
    let request = LookupRequest::new(
        args.target.pid(),
        args.target.uid(),
        args.target.gid(),
        args.label.unwrap_or_default(),
    );

    let Some(cert) = locator.fetch(&request)? else {
        eprintln!("No proxy certificate found for {}", request.ident());
        return Ok(util::to_shell_exit_code(false));
    };

    let mut out = std::io::stdout().lock();
    match args.format {
        OutputFormat::Raw => out.write_all(&cert.bytes)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &CertificatePresenter::new(&request, &cert))?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    Ok(util::to_shell_exit_code(true))
}
