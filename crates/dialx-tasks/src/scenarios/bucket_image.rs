use anyhow::{Context, Result};
use dialx_client::{Attachment, BucketClient, Message, ModelClient, Response};
use std::path::Path;

use super::{banner, DESCRIBE_PROMPT};
use crate::config::TaskConfig;
use crate::output::mime_type_for;

#[derive(Debug)]
pub struct BucketImageOutcome {
    pub attachment: Attachment,
    /// `(deployment, response)` in the order the deployments were asked
    pub responses: Vec<(String, Response)>,
}

/// Upload the local image and return it as an attachment
pub async fn put_image(config: &TaskConfig) -> Result<Attachment> {
    let image_path = &config.tasks.image_path;
    let file_name = file_name_of(image_path)?;
    let mime_type = mime_type_for(image_path);

    let image_bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read image {}", image_path.display()))?;

    let session = BucketClient::open(&config.dial)
        .await
        .context("Failed to open bucket session")?;
    let uploaded = session
        .put_file(&file_name, mime_type, image_bytes)
        .await
        .with_context(|| format!("Failed to upload {file_name}"))?;
    session.close();

    Ok(Attachment::new(file_name, uploaded.url, mime_type))
}

pub async fn run(config: &TaskConfig) -> Result<BucketImageOutcome> {
    banner("Testing DIAL-style Image Analysis with Bucket Storage");

    let attachment = put_image(config).await?;

    println!("\n📎 Uploaded Attachment:");
    println!("   Title: {}", attachment.title);
    println!("   URL: {}", attachment.url);
    println!("   Type: {}\n", attachment.mime_type);

    let message = Message::user(DESCRIBE_PROMPT).with_attachments(vec![attachment.clone()]);
    let messages = [message];

    let mut responses = Vec::with_capacity(config.tasks.vision_deployments.len());
    for (i, deployment) in config.tasks.vision_deployments.iter().enumerate() {
        if i > 0 {
            banner(&format!("Testing with {deployment}"));
        }

        let client = ModelClient::from_config(&config.dial, deployment.as_str())
            .context("Failed to create model client")?;
        let response = client
            .get_completion(&messages, None)
            .await
            .with_context(|| format!("Completion with attachment from {deployment} failed"))?;

        println!("\n✅ {} Response: {}\n", deployment, response.content());
        responses.push((deployment.clone(), response));
    }

    Ok(BucketImageOutcome {
        attachment,
        responses,
    })
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("Image path {} has no file name", path.display()))
}
