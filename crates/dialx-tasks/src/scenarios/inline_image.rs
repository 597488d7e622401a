use anyhow::{Context, Result};
use dialx_client::{ContentPart, Message, ModelClient, Response};
use tracing::info;

use super::{banner, DESCRIBE_PROMPT};
use crate::config::TaskConfig;
use crate::output::mime_type_for;

pub const DEPLOYMENT: &str = "gpt-4o";
const REMOTE_PROMPT: &str = "Describe this elephant image in detail.";

#[derive(Debug)]
pub struct InlineImageOutcome {
    /// Answer about the base64-embedded local image
    pub inline: Response,
    /// Answer about the image referenced by remote URL
    pub remote: Response,
}

pub async fn run(config: &TaskConfig) -> Result<InlineImageOutcome> {
    let image_path = &config.tasks.image_path;
    let image_bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read image {}", image_path.display()))?;
    info!(path = %image_path.display(), bytes = image_bytes.len(), "Loaded local image");

    let client = ModelClient::from_config(&config.dial, DEPLOYMENT)
        .context("Failed to create model client")?;

    banner("Testing OpenAI-style Image Analysis with Base64 encoding");

    let message = Message::user(vec![
        ContentPart::text(DESCRIBE_PROMPT),
        ContentPart::inline_image(mime_type_for(image_path), &image_bytes),
    ]);
    let inline = client
        .get_completion(&[message], None)
        .await
        .with_context(|| format!("Completion with inline image from {DEPLOYMENT} failed"))?;
    println!("\n✅ Response: {}\n", inline.content());

    banner("Testing with image URL");

    let url_message = Message::user(vec![
        ContentPart::text(REMOTE_PROMPT),
        ContentPart::image_url(config.tasks.remote_image_url.as_str()),
    ]);
    let remote = client
        .get_completion(&[url_message], None)
        .await
        .with_context(|| format!("Completion with image URL from {DEPLOYMENT} failed"))?;
    println!("\n✅ Response: {}\n", remote.content());

    Ok(InlineImageOutcome { inline, remote })
}
