use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber for hosts and tests.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` over
/// `info` for this crate.
pub fn init(verbose: bool) {
    let default_level = if verbose { "hexcrawl=debug" } else { "hexcrawl=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Fails only when a subscriber is already installed; repeated calls are fine.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
