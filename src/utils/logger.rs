use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise our own crate at info, or debug when verbose.
fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("social_uploader=debug,info")
        } else {
            EnvFilter::new("social_uploader=info")
        }
    })
}

/// Terminal logging for one-shot subcommands: no timestamps, no targets.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(fmt::layer().without_time().with_target(false).compact())
        .init();
}

/// Server logging. `json` switches to one JSON object per line for container log collectors.
pub fn init_server_logger(verbose: bool, json: bool) {
    let registry = tracing_subscriber::registry().with(filter(verbose));
    if json {
        registry
            .with(fmt::layer().json().with_current_span(false).with_target(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false).compact()).init();
    }
}
