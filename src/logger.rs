use tracing_subscriber::{EnvFilter, fmt};

/// Initializes tracing using the `RUST_LOG` environment variable.
///
/// Defaults to the `info` level. Logs go to stderr so they do not mix with
/// the screen drawn on stdout. Tests should prefer [`try_init`].
///
/// # Examples
///
/// ```no_run
/// use emotion_sense::logger;
/// unsafe { std::env::set_var("RUST_LOG", "debug") };
/// logger::try_init().expect("logger initialized");
/// ```
pub fn init() {
    try_init().expect("failed to initialize tracing")
}

/// Attempts to initialize tracing and returns an error if a subscriber is
/// already set.
pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(Into::into)
}

