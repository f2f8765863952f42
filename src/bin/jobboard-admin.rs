use anyhow::Result;
use clap::Parser;
use job_board::account_cli::{handle_admin_command, AdminCli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("job_board=info")),
        )
        .init();

    handle_admin_command(AdminCli::parse()).await
}
