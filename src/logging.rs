use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Logs go to stderr so that command
/// output on stdout is left untouched.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
