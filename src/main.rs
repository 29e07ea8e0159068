use color_eyre::eyre::Result;
use dotenv::dotenv;
use educonnect_api::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Open storage; PostgreSQL schemas are created on first connect
    let store = educonnect_db::connect(&config.database_url, config.max_connections).await?;

    // Start API server
    educonnect_api::start_server(config, store).await?;

    Ok(())
}
