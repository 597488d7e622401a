use anyhow::Result;
use dialx_tasks::{init_logging, scenarios::inline_image, TaskConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = TaskConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    init_logging(&config.logging);

    inline_image::run(&config).await?;
    Ok(())
}
