//! CLI for the NetBeans proxy tests.
//!
//! Takes no arguments: the cache, servers and manifest pattern are fixed, and
//! the proxy comes from `http_proxy` / `https_proxy` in the environment.

use anyhow::Result;
use clap::Parser;
use nbproxy_core::config;
use nbproxy_core::download_binaries::DownloadBinaries;
use nbproxy_core::runner::{proxy_test_context, ProxyTestRunner};
use std::process::ExitCode;

/// Runs the NetBeans Proxy Tests.
#[derive(Debug, Parser)]
#[command(name = "nbproxy", version)]
#[command(
    about = "Download NetBeans external binaries through the proxy named in the environment",
    long_about = "Download NetBeans external binaries through the proxy named in the environment.\n\n\
Start a proxy server and define the proxy variables first, for example:\n\n  \
export http_proxy=http://10.10.10.1:3128/\n  \
export https_proxy=http://10.10.10.1:3128/\n\n\
Then run nbproxy from the root of a NetBeans source tree. Every \
**/external/binaries-list manifest is processed; binaries are cached in \
./hgexternalcache."
)]
pub struct Cli {}

pub fn run_from_args() -> Result<ExitCode> {
    let _cli = Cli::parse();
    let cfg = config::load()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let ctx = proxy_test_context();
    let runner = ProxyTestRunner::new(DownloadBinaries::new(cfg.network));
    Ok(runner.run(&ctx))
}
