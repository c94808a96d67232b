//! Command line interface for kodegen_bundler_webapp.
//!
//! Parses flags (plus an optional defaults file) into a build request,
//! runs the build against the detected host and reports the result.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::build::AppBuilder;
use crate::error::Result;
use crate::host::HostEnvironment;
use crate::logger::Logger;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let output = OutputManager::new(args.quiet);
    let log = Logger::new(args.quiet);

    let raw = args.into_request().await?;
    let host = HostEnvironment::detect()?;
    log.debug(format!(
        "Host: {} (elevated: {}, wine: {})",
        host.os.name(),
        host.elevated,
        host.has_wine
    ));

    let result = AppBuilder::new(host).with_logger(log).build(raw).await?;
    output.report(&result)?;
    Ok(0)
}
