pub mod config;
pub mod models;
pub mod phenotype;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins when set;
/// otherwise `verbose` selects debug output for this crate.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "osa_phenotyper_lib=debug,osa_phenotyper=debug"
    } else {
        config::default_log_filter()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();

    tracing::debug!("{} v{} starting", config::APP_NAME, config::APP_VERSION);
}
