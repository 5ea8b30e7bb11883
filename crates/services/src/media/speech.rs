use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::SpeechError;

pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const SLOW_SPEED: &str = "0.3";

/// Encoded audio ready to be streamed to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Turns a sentence into spoken audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// # Errors
    ///
    /// Returns `SpeechError` if no audio could be produced.
    async fn synthesize(&self, text: &str, lang: &str) -> Result<AudioClip, SpeechError>;
}

#[derive(Clone, Debug)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub slow: bool,
    pub timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TTS_URL.into(),
            slow: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Speech backed by the public Google Translate text-to-speech endpoint (MP3).
#[derive(Clone)]
pub struct GoogleTranslateTts {
    client: Client,
    config: SpeechConfig,
}

impl GoogleTranslateTts {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: SpeechConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn request_url(&self, text: &str, lang: &str) -> Result<Url, SpeechError> {
        let mut url = Url::parse(&self.config.endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("ie", "UTF-8")
                .append_pair("q", text)
                .append_pair("tl", lang)
                .append_pair("client", "tw-ob");
            if self.config.slow {
                query.append_pair("ttsspeed", SLOW_SPEED);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<AudioClip, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let url = self.request_url(text, lang)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SpeechError::HttpStatus(response.status()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(AudioClip {
            bytes: bytes.to_vec(),
            content_type: "audio/mpeg",
        })
    }
}
