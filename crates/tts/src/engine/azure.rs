use std::borrow::Cow;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use speechgate_config::EngineConfig;
use url::Url;

use super::{EngineError, SpeechEngine};
use crate::{
    http_client::http_client,
    types::{SynthesisRequest, VoiceDescriptor},
};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// Azure Cognitive Services Speech, spoken to over its REST API
pub struct AzureSpeechEngine {
    client: Client,
    synthesis_url: Url,
    voices_url: Url,
    subscription_key: Option<SecretString>,
}

impl AzureSpeechEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let synthesis_url = match &config.base_url {
            Some(url) => url.clone(),
            None => regional_url(&config.region, "cognitiveservices/v1")?,
        };
        let voices_url = match &config.voices_url {
            Some(url) => url.clone(),
            None => regional_url(&config.region, "cognitiveservices/voices/list")?,
        };

        Ok(Self {
            client: http_client(config.timeout)?,
            synthesis_url,
            voices_url,
            subscription_key: config.subscription_key.clone(),
        })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.subscription_key {
            Some(key) => builder.header(SUBSCRIPTION_KEY_HEADER, key.expose_secret()),
            None => builder,
        }
    }
}

fn regional_url(region: &str, path: &str) -> Result<Url, EngineError> {
    let raw = format!("https://{region}.tts.speech.microsoft.com/{path}");
    Url::parse(&raw).map_err(|e| EngineError::Config(format!("invalid speech region '{region}': {e}")))
}

/// Render the SSML document the synthesis endpoint expects
fn build_ssml(request: &SynthesisRequest) -> String {
    format!(
        concat!(
            r#"<speak xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="http://www.w3.org/2001/mstts" version="1.0" xml:lang="{lang}">"#,
            r#"<voice name="{voice}">"#,
            r#"<mstts:express-as style="general" styledegree="1.0" role="default">"#,
            r#"<prosody rate="{rate}%" pitch="{pitch}%" volume="50">{text}</prosody>"#,
            r#"</mstts:express-as></voice></speak>"#,
        ),
        lang = escape_xml(voice_locale(&request.voice)),
        voice = escape_xml(&request.voice),
        rate = escape_xml(&request.rate),
        pitch = escape_xml(&request.pitch),
        text = escape_xml(&request.text),
    )
}

/// Locale prefix of a voice short name (`en-US-AvaNeural` -> `en-US`)
fn voice_locale(voice: &str) -> &str {
    let mut dashes = voice.match_indices('-').map(|(i, _)| i);
    match (dashes.next(), dashes.next()) {
        (Some(_), Some(end)) => &voice[..end],
        _ => "en-US",
    }
}

fn escape_xml(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }

    let mut escaped = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

async fn api_error(response: reqwest::Response) -> EngineError {
    let status = response.status();
    let message = match response.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => status.canonical_reason().unwrap_or("Unknown error").to_string(),
    };

    tracing::error!("Azure Speech API error ({status}): {message}");

    EngineError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl SpeechEngine for AzureSpeechEngine {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Bytes, EngineError> {
        tracing::debug!(
            "Azure Speech request: voice={}, rate={}, pitch={}, format={}, input_len={}",
            request.voice,
            request.rate,
            request.pitch,
            request.output_format,
            request.text.len(),
        );

        let builder = self
            .client
            .post(self.synthesis_url.clone())
            .header(http::header::CONTENT_TYPE, "application/ssml+xml")
            .header(OUTPUT_FORMAT_HEADER, &request.output_format)
            .body(build_ssml(request));

        let response = self.authorize(builder).send().await.map_err(|e| {
            tracing::error!("Azure Speech request failed: {e}");
            EngineError::Connection(e.to_string())
        })?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read Azure Speech response body: {e}");
            EngineError::Connection(e.to_string())
        })?;

        tracing::debug!("Azure Speech synthesis complete, {} bytes", audio.len());

        Ok(audio)
    }

    async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, EngineError> {
        let response = self
            .authorize(self.client.get(self.voices_url.clone()))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Azure voice list request failed: {e}");
                EngineError::Connection(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json::<Vec<VoiceDescriptor>>()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("voice list: {e}")))
    }

    fn name(&self) -> &str {
        "azure"
    }
}
