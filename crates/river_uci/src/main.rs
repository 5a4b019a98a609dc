use river_uci::{serve, EngineConfig, ProtocolHandler};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Filter directives for stderr logging, e.g. `RIVER_LOG=river_core=debug`.
const LOG_ENV: &str = "RIVER_LOG";

fn main() -> anyhow::Result<()> {
    // UCI engines communicate via stdin/stdout, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let arg = std::env::args().nth(1);
    let config = EngineConfig::load(arg.as_deref())?;
    info!(name = %config.name, max_depth = config.max_depth, "engine starting");

    let mut handler = ProtocolHandler::new(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serve(&mut handler, std::io::stdin(), &mut out)
}
