use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::speech::DEFAULT_TIMEOUT;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Why an illustration could not be produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnavailableReason {
    #[error("image generation is not configured")]
    MissingCredential,
    #[error("image service returned status {0}")]
    HttpStatus(StatusCode),
    #[error("image service timed out")]
    Timeout,
    #[error("image service unreachable: {0}")]
    Network(String),
    #[error("image service returned no image")]
    EmptyResponse,
    #[error("image payload could not be decoded: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for UnavailableReason {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidPayload(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResult {
    Ready(GeneratedImage),
    Unavailable(UnavailableReason),
}

/// Turns an illustration prompt into an image.
///
/// Failures are values, not errors: the page is still readable without a picture.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> ImageResult;
}

#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub size: String,
    pub timeout: Duration,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IMAGE_BASE_URL.into(),
            api_key: None,
            model: DEFAULT_IMAGE_MODEL.into(),
            size: DEFAULT_IMAGE_SIZE.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for an OpenAI-compatible `/images/generations` endpoint.
#[derive(Clone)]
pub struct OpenAiImages {
    client: Client,
    config: ImageConfig,
}

impl OpenAiImages {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: ImageConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn request(&self, prompt: &str) -> Result<GeneratedImage, UnavailableReason> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(UnavailableReason::MissingCredential)?;

        let url = format!(
            "{}/images/generations",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ImageRequest {
            model: &self.config.model,
            prompt,
            n: 1,
            size: &self.config.size,
            response_format: "b64_json",
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UnavailableReason::HttpStatus(response.status()));
        }

        let body: ImageResponse = response.json().await?;
        decode_first_image(body)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImages {
    async fn generate(&self, prompt: &str) -> ImageResult {
        match self.request(prompt).await {
            Ok(image) => ImageResult::Ready(image),
            Err(reason) => ImageResult::Unavailable(reason),
        }
    }
}

fn decode_first_image(body: ImageResponse) -> Result<GeneratedImage, UnavailableReason> {
    let encoded = body
        .data
        .into_iter()
        .next()
        .and_then(|item| item.b64_json)
        .filter(|data| !data.is_empty())
        .ok_or(UnavailableReason::EmptyResponse)?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|err| UnavailableReason::InvalidPayload(err.to_string()))?;
    Ok(GeneratedImage {
        bytes,
        content_type: "image/png",
    })
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    response_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}
