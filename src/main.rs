use anyhow::Result;
use job_board::{start_web_server, AppConfig};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("job_board=info,rocket::server=off")),
        )
        .init();

    let config = AppConfig::load()?;
    info!("Loaded configuration for environment: {}", config.environment);

    start_web_server(config).await
}
