// Bucket storage session for exchanging files with the gateway by reference

use reqwest::multipart::{Form, Part};
use reqwest::header::HeaderValue;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{DialError, Result};
use crate::http::{api_key_header, build_http_client, gateway_error, API_KEY_HEADER};

/// Descriptor returned by an upload
///
/// Only `url` is guaranteed; it can be passed to `get_file` or used as an
/// attachment URL in a message right away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BucketInfo {
    bucket: String,
}

/// Scoped bucket session
///
/// `open` resolves the caller's bucket; the underlying connection pool is
/// released when the session is closed or dropped, whichever comes first.
/// The `api-key` header is only sent to the gateway's own origin.
#[derive(Debug)]
pub struct BucketClient {
    http_client: reqwest::Client,
    api_key: HeaderValue,
    base_url: Url,
    bucket: String,
}

impl BucketClient {
    /// Open a session against `{base_url}/v1/bucket`
    pub async fn open(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let api_key = api_key_header(&config.api_key)?;
        let http_client = build_http_client(config.timeout())?;
        let base_url = Url::parse(config.base_url())
            .map_err(|e| DialError::Config(format!("invalid base URL '{}': {e}", config.base_url)))?;
        let endpoint = format!("{}/v1/bucket", config.base_url());

        let response = http_client
            .get(&endpoint)
            .header(API_KEY_HEADER, api_key.clone())
            .send()
            .await
            .map_err(|e| DialError::transport(&endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DialError::transport(&endpoint, e))?;

        if !status.is_success() {
            return Err(gateway_error(status, &body, &endpoint));
        }

        let info: BucketInfo = serde_json::from_str(&body)
            .map_err(|e| DialError::protocol(&endpoint, format!("unexpected bucket info: {e}")))?;

        debug!(bucket = %info.bucket, "Bucket session opened");

        Ok(Self {
            http_client,
            api_key,
            base_url,
            bucket: info.bucket,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload bytes as `name` with the given MIME type
    ///
    /// An empty `name` is replaced by a generated one.
    pub async fn put_file(
        &self,
        name: &str,
        mime_type: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<FileReference> {
        let name = if name.trim().is_empty() {
            generate_file_name(mime_type)
        } else {
            name.to_string()
        };
        let endpoint = self.file_url(&name)?;
        let content = content.into();
        let size = content.len();

        let part = Part::bytes(content)
            .file_name(name.clone())
            .mime_str(mime_type)
            .map_err(|_| DialError::Validation(format!("invalid MIME type '{mime_type}'")))?;
        let form = Form::new().part("file", part);

        info!(name = %name, mime_type, bytes = size, "Uploading file to bucket");

        let response = self
            .authorized(self.http_client.put(endpoint.clone()))
            .multipart(form)
            .send()
            .await
            .map_err(|e| DialError::transport(endpoint.as_str(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DialError::transport(endpoint.as_str(), e))?;

        if !status.is_success() {
            return Err(gateway_error(status, &body, endpoint.as_str()));
        }

        serde_json::from_str(&body).map_err(|e| {
            DialError::protocol(endpoint.as_str(), format!("unexpected upload result: {e}"))
        })
    }

    /// Download the full content behind a URL returned by an upload or a completion
    pub async fn get_file(&self, url: &str) -> Result<Vec<u8>> {
        let target = self.resolve_url(url)?;
        let endpoint = target.to_string();

        debug!(url, "Downloading file from bucket");

        let request = self.http_client.get(target.clone());
        let request = if self.is_gateway(&target) {
            self.authorized(request)
        } else {
            debug!(url, "Fetching foreign URL without credentials");
            request
        };
        let response = request
            .send()
            .await
            .map_err(|e| DialError::transport(&endpoint, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DialError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| DialError::transport(&endpoint, e))?;
            return Err(gateway_error(status, &body, &endpoint));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DialError::transport(&endpoint, e))?;
        Ok(bytes.to_vec())
    }

    /// End the session explicitly
    pub fn close(self) {
        drop(self);
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, self.api_key.clone())
    }

    fn is_gateway(&self, url: &Url) -> bool {
        url.origin() == self.base_url.origin()
    }

    fn file_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DialError::Config(format!("base URL '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v1", "files", self.bucket.as_str()])
            .extend(name.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Absolute URLs are used as-is; bucket references resolve under `/v1/`
    fn resolve_url(&self, url: &str) -> Result<Url> {
        let resolved = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            let base = self.base_url.as_str().trim_end_matches('/');
            format!("{}/v1/{}", base, url.trim_start_matches('/'))
        };
        Url::parse(&resolved)
            .map_err(|e| DialError::Validation(format!("invalid file URL '{url}': {e}")))
    }
}

impl Drop for BucketClient {
    fn drop(&mut self) {
        debug!(bucket = %self.bucket, "Bucket session closed");
    }
}

fn generate_file_name(mime_type: &str) -> String {
    let extension = match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "text/plain" => "txt",
        _ => "bin",
    };
    format!("{}.{}", Uuid::new_v4(), extension)
}
