// Chat-completion client for DIAL deployments

use reqwest::header::HeaderValue;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::wire::ChatCompletionResponse;
use crate::config::{ClientConfig, DEFAULT_TIMEOUT_SECS};
use crate::error::{DialError, Result};
use crate::generation::{CustomFields, GenerationParams, ProviderFamily};
use crate::http::{api_key_header, build_http_client, gateway_error, API_KEY_HEADER};
use crate::types::{Message, Response};

/// Model client (HTTP direct, no SDK)
///
/// DIAL routes by deployment name in the URL and authenticates with an
/// `api-key` header:
/// - URL: {base_url}/openai/deployments/{deployment}/chat/completions
/// - one POST per `get_completion` call, never retried
#[derive(Debug)]
pub struct ModelClient {
    http_client: reqwest::Client,
    api_key: HeaderValue,
    endpoint: String,
    deployment_name: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_fields: Option<RequestCustomFields>,
}

#[derive(Serialize)]
struct RequestCustomFields {
    configuration: CustomFields,
}

impl ModelClient {
    /// Create new model client with builder pattern
    pub fn builder() -> ModelClientBuilder {
        ModelClientBuilder::default()
    }

    /// Create a client for one deployment from shared configuration
    pub fn from_config(config: &ClientConfig, deployment_name: impl Into<String>) -> Result<Self> {
        config.validate()?;
        Self::builder()
            .api_key(&config.api_key)
            .endpoint(config.completions_template())
            .deployment_name(deployment_name)
            .timeout(config.timeout())
            .build()
    }

    pub fn deployment_name(&self) -> &str {
        &self.deployment_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request one completion
    ///
    /// `params` are forwarded as the gateway's generation configuration after
    /// being checked against the deployment's provider family.
    pub async fn get_completion(
        &self,
        messages: &[Message],
        params: Option<&GenerationParams>,
    ) -> Result<Response> {
        let payload = self.build_request(messages, params)?;

        info!(
            deployment = %self.deployment_name,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DialError::transport(&self.endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DialError::transport(&self.endpoint, e))?;

        if !status.is_success() {
            return Err(gateway_error(status, &body, &self.endpoint));
        }

        let response = self.parse_response(&body)?;
        debug!(
            deployment = %self.deployment_name,
            attachments = response.attachments().len(),
            "Chat completion received"
        );
        Ok(response)
    }

    /// Validate inputs and build the request body; performs no I/O
    fn build_request<'a>(
        &self,
        messages: &'a [Message],
        params: Option<&GenerationParams>,
    ) -> Result<ChatCompletionRequest<'a>> {
        if messages.is_empty() {
            return Err(DialError::Validation(
                "at least one message is required".to_string(),
            ));
        }

        let custom_fields = match params {
            Some(params) => Some(RequestCustomFields {
                configuration: self.prepare_fields(params)?,
            }),
            None => None,
        };

        Ok(ChatCompletionRequest {
            messages,
            custom_fields,
        })
    }

    fn prepare_fields(&self, params: &GenerationParams) -> Result<CustomFields> {
        let family = params.family();
        if let Some(expected) = ProviderFamily::from_deployment(&self.deployment_name) {
            if expected != family {
                return Err(DialError::Validation(format!(
                    "{} parameters cannot be sent to {} deployment '{}'",
                    family, expected, self.deployment_name
                )));
            }
        }

        params.validate()?;
        let fields = params.to_fields();
        fields.validate(family)?;
        Ok(fields)
    }

    fn parse_response(&self, body: &str) -> Result<Response> {
        let raw: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
            DialError::protocol(&self.endpoint, format!("unexpected response body: {e}"))
        })?;

        let choice = raw
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DialError::protocol(&self.endpoint, "response contained no choices"))?;

        Ok(Response::new(
            choice.message.content.unwrap_or_default(),
            choice.message.custom_content,
        ))
    }
}

/// Builder for ModelClient
#[derive(Default)]
pub struct ModelClientBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
    deployment_name: Option<String>,
    timeout: Option<Duration>,
}

impl ModelClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the chat-completions endpoint
    ///
    /// May contain a `{model}` placeholder that is replaced by the deployment name.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn deployment_name(mut self, deployment_name: impl Into<String>) -> Self {
        self.deployment_name = Some(deployment_name.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ModelClient> {
        let api_key = self
            .api_key
            .ok_or_else(|| DialError::Config("API key is required".to_string()))?;
        let endpoint = self
            .endpoint
            .ok_or_else(|| DialError::Config("Endpoint is required".to_string()))?;
        let deployment_name = self
            .deployment_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| DialError::Config("Deployment name is required".to_string()))?;
        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let endpoint = endpoint.replace("{model}", &deployment_name);
        let api_key = api_key_header(&api_key)?;
        let http_client = build_http_client(timeout)?;

        Ok(ModelClient {
            http_client,
            api_key,
            endpoint,
            deployment_name,
        })
    }
}
