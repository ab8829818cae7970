use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "milestone_lookup=info,milestone_core=info,tower_http=info";
const VERBOSE_FILTER: &str = "milestone_lookup=debug,milestone_core=debug,tower_http=debug,info";

/// Install the global tracing subscriber. `RUST_LOG` overrides the defaults.
pub fn init_logger(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Tests may install a subscriber more than once.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}
