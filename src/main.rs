mod shutdown;
mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting Kalenteri event API");

    // Load configuration
    let config = startup::load_config()?;

    // Serve until a shutdown signal arrives
    startup::start_server(config).await
}
