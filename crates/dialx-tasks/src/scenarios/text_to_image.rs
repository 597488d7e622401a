use anyhow::{Context, Result};
use dialx_client::{
    AspectRatio, Attachment, BucketClient, DalleParams, GenerationParams, ImageQuality, ImageSize,
    ImageStyle, ImagenParams, Message, ModelClient,
};
use std::path::PathBuf;
use tracing::{info, warn};

use super::banner;
use crate::config::TaskConfig;
use crate::output::save_image;

pub const PROMPT: &str =
    "Sunny day on Bali with beautiful beach, palm trees, and crystal clear water";

/// One generation request: a deployment and the parameters valid for it
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub title: String,
    pub deployment: String,
    pub params: GenerationParams,
}

impl GenerationJob {
    pub fn new(
        title: impl Into<String>,
        deployment: impl Into<String>,
        params: impl Into<GenerationParams>,
    ) -> Self {
        Self {
            title: title.into(),
            deployment: deployment.into(),
            params: params.into(),
        }
    }
}

pub fn default_jobs() -> Vec<GenerationJob> {
    vec![
        GenerationJob::new(
            "DALL-E 3",
            "dall-e-3",
            DalleParams::new(ImageSize::Square, ImageQuality::Hd, ImageStyle::Vivid),
        ),
        GenerationJob::new(
            "Imagen",
            "imagegeneration@005",
            ImagenParams::new(AspectRatio::Landscape, 1),
        ),
    ]
}

pub async fn run(config: &TaskConfig) -> Result<Vec<PathBuf>> {
    run_jobs(config, &default_jobs()).await
}

/// Run each job in order and save every returned image
///
/// Image indices keep counting across jobs so files written within the same
/// second never collide.
pub async fn run_jobs(config: &TaskConfig, jobs: &[GenerationJob]) -> Result<Vec<PathBuf>> {
    let mut saved = Vec::new();

    for job in jobs {
        banner(&format!("Testing Text-to-Image Generation with {}", job.title));

        let client = ModelClient::from_config(&config.dial, job.deployment.as_str())
            .context("Failed to create model client")?;
        let message = Message::user(PROMPT);

        println!("\n🎨 Generating image with prompt: '{PROMPT}'\n");

        let response = client
            .get_completion(&[message], Some(&job.params))
            .await
            .with_context(|| format!("Image generation with {} failed", job.deployment))?;

        let attachments = response.attachments();
        if attachments.is_empty() {
            warn!(deployment = %job.deployment, "No attachments returned");
            println!("⚠️ No images were generated");
            continue;
        }

        println!("\n📎 Generated {} image(s)", attachments.len());
        let paths = save_images(config, attachments, saved.len()).await?;
        saved.extend(paths);
    }

    banner("✅ Text-to-Image generation completed successfully!");
    Ok(saved)
}

/// Download attachments through one bucket session and write them to disk
async fn save_images(
    config: &TaskConfig,
    attachments: &[Attachment],
    first_index: usize,
) -> Result<Vec<PathBuf>> {
    let session = BucketClient::open(&config.dial)
        .await
        .context("Failed to open bucket session")?;

    let mut paths = Vec::with_capacity(attachments.len());
    for attachment in attachments.iter().filter(|a| !a.url.is_empty()) {
        let index = first_index + paths.len() + 1;
        let bytes = session
            .get_file(&attachment.url)
            .await
            .with_context(|| format!("Failed to download {}", attachment.url))?;

        let path = save_image(&config.tasks.output_dir, index, &bytes).await?;
        info!(url = %attachment.url, path = %path.display(), "Image saved");
        println!("✅ Image saved locally as: {}", path.display());
        paths.push(path);
    }

    session.close();
    Ok(paths)
}
