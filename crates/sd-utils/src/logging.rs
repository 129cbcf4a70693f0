use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,sd=debug";

/// Initialize the logging system with sensible defaults
pub fn init_logging() {
    init_logging_with_filter(DEFAULT_FILTER);
}

/// Initialize logging with a custom filter.
///
/// `RUST_LOG` still wins when set. Calling this twice is a no-op.
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Convenience macros for structured logging
#[macro_export]
macro_rules! log_report_built {
    ($total_files:expr, $total_smells:expr, $score:expr) => {
        tracing::info!(
            total_files = $total_files,
            total_smells = $total_smells,
            quality_score = $score,
            "Report built"
        );
    };
}

#[macro_export]
macro_rules! log_version_appended {
    ($project:expr, $version:expr, $history:expr) => {
        tracing::info!(
            project = %$project,
            version = $version,
            history = $history,
            "Version appended"
        );
    };
}

#[macro_export]
macro_rules! log_portfolio_aggregated {
    ($projects:expr, $smells:expr, $score:expr) => {
        tracing::debug!(
            projects = $projects,
            total_smells = $smells,
            quality_score = %$score,
            "Portfolio aggregated"
        );
    };
}
