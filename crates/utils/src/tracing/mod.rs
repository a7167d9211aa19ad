use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warmstart_core::constants::WARMSTART_LOG_VAR;

const DEFAULT_DIRECTIVES: &str = "info";

/// Initialize the tracing system
///
/// The filter comes from `WARMSTART_LOG`, then `RUST_LOG`, then `info`.
/// Output is a compact formatter on stderr, coloured only when stderr is a
/// terminal so logcat-style redirection stays plain text.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = build_filter(
        std::env::var(WARMSTART_LOG_VAR).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_names(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Pick the first usable directive string, falling back to the default
fn build_filter(primary: Option<String>, secondary: Option<String>) -> EnvFilter {
    [primary, secondary]
        .into_iter()
        .flatten()
        .filter(|directives| !directives.trim().is_empty())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}
