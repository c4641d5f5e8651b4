//! ElevenLabs text-to-speech client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::ACCEPT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use wavee_core::config::SpeechSettings;
use wavee_core::error::{Result, WaveeError};
use wavee_core::speech::{AudioClip, SynthesisRequest, TtsClient};

const API_KEY_HEADER: &str = "xi-api-key";
const AUDIO_MPEG: &str = "audio/mpeg";

pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    settings: SpeechSettings,
}

impl ElevenLabsClient {
    pub fn new(api_key: impl Into<String>, settings: SpeechSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| WaveeError::http(None, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            settings,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn request_body<'a>(&'a self, request: &'a SynthesisRequest) -> SynthesisBody<'a> {
        SynthesisBody {
            text: &request.text,
            model_id: &self.settings.model_id,
            voice_settings: VoiceSettings {
                stability: self.settings.stability,
                similarity_boost: self.settings.similarity_boost,
                style: self.settings.style,
                use_speaker_boost: self.settings.use_speaker_boost,
                speed: request.speed,
            },
        }
    }
}

#[async_trait]
impl TtsClient for ElevenLabsClient {
    async fn validate(&self) -> Result<()> {
        let response = self
            .client
            .get(self.url("voices"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|err| WaveeError::http(None, format!("ElevenLabs request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        tracing::debug!("[ElevenLabs] API key validated");
        Ok(())
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioClip> {
        let voice = request
            .voice_id
            .as_deref()
            .unwrap_or(&self.settings.voice_id);

        let response = self
            .client
            .post(self.url(&format!("text-to-speech/{voice}")))
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, AUDIO_MPEG)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|err| WaveeError::http(None, format!("ElevenLabs request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(AUDIO_MPEG)
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| WaveeError::http(None, format!("Failed to read audio body: {err}")))?;

        if bytes.is_empty() {
            return Err(WaveeError::speech("ElevenLabs returned no audio"));
        }

        Ok(AudioClip::new(bytes.to_vec(), content_type))
    }

    fn default_voice(&self) -> &str {
        &self.settings.voice_id
    }
}

#[derive(Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
    style: f64,
    use_speaker_boost: bool,
    speed: f64,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    detail: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    status: Option<String>,
    message: Option<String>,
}

fn map_http_error(status: StatusCode, body: &str) -> WaveeError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| match (wrapper.detail.status, wrapper.detail.message) {
            (Some(s), Some(m)) => Some(format!("{s}: {m}")),
            (None, Some(m)) => Some(m),
            (Some(s), None) => Some(s),
            (None, None) => None,
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    WaveeError::http(Some(status.as_u16()), message)
}
