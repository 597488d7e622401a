use anyhow::Result;
use dialx_tasks::{init_logging, scenarios::text_to_image, TaskConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = TaskConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    init_logging(&config.logging);

    let saved = text_to_image::run(&config).await?;
    tracing::info!("Saved {} image(s)", saved.len());
    Ok(())
}
