use anyhow::Result;
use dialx_tasks::{init_logging, run_all, Runner, TaskConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = TaskConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    init_logging(&config.logging);

    let mut runner = Runner::interactive();
    run_all(&mut runner, &config).await;

    println!("\n🎉 All image generation and analysis tests finished.");
    Ok(())
}
