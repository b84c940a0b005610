use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the log filter, e.g.
/// `ENVYCONTROL_LOG=envycontrol=trace`.
pub const LOG_ENV: &str = "ENVYCONTROL_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Installs the stderr subscriber. Only warnings are shown unless `verbose`
/// is set or the filter is overridden from the environment. Conditions that
/// already print a `Warning:` line on stdout log at debug level.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
