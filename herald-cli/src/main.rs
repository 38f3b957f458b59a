//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use herald_cli::CliError;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HERALD_LOG";

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    init_logging();
    match herald_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("herald: {err}");
            std::process::exit(1);
        }
    }
}

/// Install a stderr subscriber filtered by `HERALD_LOG`, defaulting to `warn`.
///
/// Records from the `log` facade are bridged into the subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(err) = installed {
        log::warn!("logging already initialised: {err}");
    }
}
