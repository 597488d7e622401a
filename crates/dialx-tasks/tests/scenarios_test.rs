use dialx_client::{DalleParams, ImageQuality, ImageSize, ImageStyle};
use dialx_tasks::scenarios::text_to_image::{self, GenerationJob};
use dialx_tasks::scenarios::{bucket_image, inline_image};
use dialx_tasks::TaskConfig;
use mockito::Matcher;
use serde_json::json;
use std::path::Path;

const BANNER_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-dialx-banner";
const GENERATED_PNG: &[u8] = b"\x89PNG\r\n\x1a\ngenerated-bali";

fn config_for(server: &mockito::Server, workdir: &Path) -> TaskConfig {
    let mut config = TaskConfig::for_gateway("test-key", server.url());
    config.tasks.image_path = workdir.join("dialx-banner.png");
    config.tasks.output_dir = workdir.join("out");
    config.tasks.remote_image_url = "https://example.com/elephant.jpg".to_string();
    config
}

async fn mock_bucket(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("GET", "/v1/bucket")
        .with_status(200)
        .with_body(json!({"bucket": "test-bucket"}).to_string())
        .create_async()
        .await
}

fn completion_body(content: &str) -> String {
    json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]})
        .to_string()
}

#[tokio::test]
async fn test_bucket_image_scenario_describes_uploaded_banner() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(workdir.path().join("dialx-banner.png"), BANNER_PNG).unwrap();

    let mut server = mockito::Server::new_async().await;
    let _bucket = mock_bucket(&mut server).await;
    let upload = server
        .mock("PUT", "/v1/files/test-bucket/dialx-banner.png")
        .with_status(200)
        .with_body(json!({"url": "files/test-bucket/dialx-banner.png"}).to_string())
        .expect(1)
        .create_async()
        .await;
    let completion = server
        .mock("POST", "/openai/deployments/gpt-4o/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [{
                "role": "user",
                "custom_content": {
                    "attachments": [{
                        "title": "dialx-banner.png",
                        "url": "files/test-bucket/dialx-banner.png",
                        "type": "image/png"
                    }]
                }
            }]
        })))
        .with_status(200)
        .with_body(completion_body("A banner image."))
        .expect(1)
        .create_async()
        .await;

    let mut config = config_for(&server, workdir.path());
    config.tasks.vision_deployments = vec!["gpt-4o".to_string()];

    let outcome = bucket_image::run(&config).await.unwrap();

    assert_eq!(outcome.attachment.url, "files/test-bucket/dialx-banner.png");
    assert_eq!(outcome.responses.len(), 1);
    assert_eq!(outcome.responses[0].0, "gpt-4o");
    assert_eq!(outcome.responses[0].1.content(), "A banner image.");
    upload.assert_async().await;
    completion.assert_async().await;
}

#[tokio::test]
async fn test_bucket_image_scenario_asks_each_deployment_in_order() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(workdir.path().join("dialx-banner.png"), BANNER_PNG).unwrap();

    let mut server = mockito::Server::new_async().await;
    let _bucket = mock_bucket(&mut server).await;
    let _upload = server
        .mock("PUT", "/v1/files/test-bucket/dialx-banner.png")
        .with_body(json!({"url": "files/test-bucket/dialx-banner.png"}).to_string())
        .create_async()
        .await;

    let mut mocks = Vec::new();
    for deployment in ["gpt-4o", "claude-3-7-sonnet@20250219", "gemini-2.5-pro"] {
        let mock = server
            .mock(
                "POST",
                format!("/openai/deployments/{deployment}/chat/completions").as_str(),
            )
            .with_body(completion_body(&format!("{deployment} sees a banner")))
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    let config = config_for(&server, workdir.path());
    let outcome = bucket_image::run(&config).await.unwrap();

    let answered: Vec<&str> = outcome.responses.iter().map(|(d, _)| d.as_str()).collect();
    assert_eq!(
        answered,
        vec!["gpt-4o", "claude-3-7-sonnet@20250219", "gemini-2.5-pro"]
    );
    assert_eq!(
        outcome.responses[2].1.content(),
        "gemini-2.5-pro sees a banner"
    );
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_bucket_image_scenario_reports_failed_stage() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(workdir.path().join("dialx-banner.png"), BANNER_PNG).unwrap();

    let mut server = mockito::Server::new_async().await;
    let _bucket = mock_bucket(&mut server).await;
    let _upload = server
        .mock("PUT", "/v1/files/test-bucket/dialx-banner.png")
        .with_status(500)
        .with_body("storage unavailable")
        .create_async()
        .await;

    let config = config_for(&server, workdir.path());
    let err = bucket_image::run(&config).await.unwrap_err();

    let report = format!("{err:#}");
    assert!(report.contains("Failed to upload dialx-banner.png"));
    assert!(report.contains("storage unavailable"));
}

#[tokio::test]
async fn test_inline_image_scenario_sends_base64_then_url() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(workdir.path().join("dialx-banner.png"), BANNER_PNG).unwrap();

    let mut server = mockito::Server::new_async().await;
    let inline = server
        .mock("POST", "/openai/deployments/gpt-4o/chat/completions")
        .match_body(Matcher::Regex(r"data:image/png;base64,".to_string()))
        .with_body(completion_body("A banner image."))
        .expect(1)
        .create_async()
        .await;
    let remote = server
        .mock("POST", "/openai/deployments/gpt-4o/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [{
                "content": [
                    {"type": "text", "text": "Describe this elephant image in detail."},
                    {"type": "image_url", "image_url": {"url": "https://example.com/elephant.jpg"}}
                ]
            }]
        })))
        .with_body(completion_body("An elephant."))
        .expect(1)
        .create_async()
        .await;

    let config = config_for(&server, workdir.path());
    let outcome = inline_image::run(&config).await.unwrap();

    assert_eq!(outcome.inline.content(), "A banner image.");
    assert_eq!(outcome.remote.content(), "An elephant.");
    inline.assert_async().await;
    remote.assert_async().await;
}

#[tokio::test]
async fn test_inline_image_scenario_missing_file() {
    let workdir = tempfile::tempdir().unwrap();
    let server = mockito::Server::new_async().await;

    let config = config_for(&server, workdir.path());
    let err = inline_image::run(&config).await.unwrap_err();

    assert!(format!("{err:#}").contains("Failed to read image"));
}

#[tokio::test]
async fn test_text_to_image_writes_one_file_per_attachment() {
    let workdir = tempfile::tempdir().unwrap();

    let mut server = mockito::Server::new_async().await;
    let _bucket = mock_bucket(&mut server).await;
    let generation = server
        .mock("POST", "/openai/deployments/dall-e-3/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "custom_fields": {
                "configuration": {"size": "1024x1024", "quality": "hd", "style": "vivid"}
            }
        })))
        .with_status(200)
        .with_body(
            json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "",
                        "custom_content": {
                            "attachments": [
                                {"title": "Image", "type": "image/png", "url": "files/test-bucket/img-1.png"},
                                {"title": "Image", "type": "image/png", "url": "files/test-bucket/img-2.png"}
                            ]
                        }
                    }
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let downloads = server
        .mock(
            "GET",
            Matcher::Regex(r"^/v1/files/test-bucket/img-[12]\.png$".to_string()),
        )
        .with_status(200)
        .with_body(GENERATED_PNG)
        .expect(2)
        .create_async()
        .await;

    let config = config_for(&server, workdir.path());
    let jobs = [GenerationJob::new(
        "DALL-E 3",
        "dall-e-3",
        DalleParams::new(ImageSize::Square, ImageQuality::Hd, ImageStyle::Vivid),
    )];

    let saved = text_to_image::run_jobs(&config, &jobs).await.unwrap();
    assert_eq!(saved.len(), 2);

    let mut written: Vec<String> = std::fs::read_dir(&config.tasks.output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written.len(), 2);

    for (i, name) in written.iter().enumerate() {
        assert!(is_generated_name(name, i + 1), "unexpected file name {name}");
        let bytes = std::fs::read(config.tasks.output_dir.join(name)).unwrap();
        assert_eq!(bytes, GENERATED_PNG);
    }

    generation.assert_async().await;
    downloads.assert_async().await;
}

#[tokio::test]
async fn test_text_to_image_without_attachments_writes_nothing() {
    let workdir = tempfile::tempdir().unwrap();

    let mut server = mockito::Server::new_async().await;
    let _generation = server
        .mock("POST", "/openai/deployments/dall-e-3/chat/completions")
        .with_body(
            json!({"choices": [{"message": {"content": "", "custom_content": {}}}]}).to_string(),
        )
        .create_async()
        .await;

    let config = config_for(&server, workdir.path());
    let jobs = [GenerationJob::new("DALL-E 3", "dall-e-3", DalleParams::default())];

    let saved = text_to_image::run_jobs(&config, &jobs).await.unwrap();

    assert!(saved.is_empty());
    assert!(!config.tasks.output_dir.exists());
}

#[test]
fn test_default_jobs_cover_both_provider_families() {
    let jobs = text_to_image::default_jobs();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].deployment, "dall-e-3");
    assert_eq!(jobs[1].deployment, "imagegeneration@005");
}

/// `generated_image_<YYYYMMDD>_<HHMMSS>_<index>.png`
fn is_generated_name(name: &str, index: usize) -> bool {
    let Some(rest) = name
        .strip_prefix("generated_image_")
        .and_then(|rest| rest.strip_suffix(&format!("_{index}.png")))
    else {
        return false;
    };
    match rest.split_once('_') {
        Some((date, time)) => {
            date.len() == 8
                && time.len() == 6
                && date.chars().all(|c| c.is_ascii_digit())
                && time.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
