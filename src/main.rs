use linkhop::config::Config;
use linkhop::server;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate()?;

    init_logging(&config);

    server::run(config).await
}

/// Initializes the global tracing subscriber from config.
///
/// `LOG_FORMAT=json` switches to machine-readable output; the filter comes
/// from `RUST_LOG` with an `info` fallback.
fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
