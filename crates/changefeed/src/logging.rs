use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// The level comes from `RUST_LOG` when set, otherwise from the number of
/// `-v` flags (warn, debug, trace).
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    // Stdout carries command output, so logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .try_init();
}
