use duet_assistant::{api::start_server, build_orchestrator, logging, AssistantConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    logging::init_tracing();

    let config = AssistantConfig::from_env()?;

    info!("Duet Assistant - WhatsApp webhook");
    info!("Port: {}", config.port);
    info!("Memory file: {}", config.memory.file_path.display());

    let orchestrator = Arc::new(build_orchestrator(&config).await?);

    info!("Assistant initialized");

    start_server(orchestrator, config.port).await?;

    Ok(())
}
