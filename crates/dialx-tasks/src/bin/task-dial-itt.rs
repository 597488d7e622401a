use anyhow::Result;
use dialx_tasks::{init_logging, scenarios::bucket_image, TaskConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = TaskConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    init_logging(&config.logging);

    bucket_image::run(&config).await?;
    Ok(())
}
