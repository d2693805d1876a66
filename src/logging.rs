//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global tracing subscriber writing to stderr.
///
/// `RUST_LOG` wins over `default_directive` when set.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    // Progress lines come from pool workers, so thread names are kept.
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    tracing::debug!(directive = default_directive, "tracing initialised");
    Ok(())
}
