use super::types::{
    transcript_from, ChatOutcome, ChatRequest, CommandAck, DeviceStatus, LightCommand, Route,
    SttRequest, TtsRequest, TvCommand,
};
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::services::sse::{SseDecoder, StreamFrame};
use base64::Engine;
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client for the PC backend (chat, speech, device control).
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        let api_key = Some(config.api_key.trim().to_string()).filter(|k| !k.is_empty());
        Self {
            client: Client::builder()
                .connect_timeout(config.connect_timeout())
                .timeout(config.read_timeout())
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(format!("{}{}", self.base_url, path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(format!("{}{}", self.base_url, path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::from_status(status.as_u16()));
        }
        Ok(response)
    }

    async fn send_json(request: RequestBuilder) -> Result<Value, BackendError> {
        let response = Self::send(request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| BackendError::Malformed(e.to_string()))
    }

    pub async fn health(&self) -> Result<(), BackendError> {
        Self::send(self.get("/health")).await.map(|_| ())
    }

    /// `POST /chat`
    pub async fn chat(&self, message: &str) -> Result<String, BackendError> {
        let body = Self::send_json(self.post("/chat").json(&ChatRequest { message })).await?;
        match ChatOutcome::from_value(&body) {
            ChatOutcome::Reply(reply) => Ok(reply),
            ChatOutcome::Rejected(error) => Err(BackendError::Remote(error)),
        }
    }

    /// `POST /chat/stream`. Calls `on_token` for every token and returns
    /// the concatenated reply once `[DONE]` arrives or the stream ends.
    pub async fn chat_stream<F>(&self, message: &str, mut on_token: F) -> Result<String, BackendError>
    where
        F: FnMut(&str),
    {
        let response = Self::send(
            self.post("/chat/stream")
                .header(reqwest::header::ACCEPT, "text/event-stream")
                .json(&ChatRequest { message }),
        )
        .await?;

        let mut decoder = SseDecoder::new();
        let mut reply = String::new();
        let mut body = response.bytes_stream();

        'read: while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for event in decoder.push(&chunk) {
                match StreamFrame::from(&event) {
                    StreamFrame::Token(token) => {
                        reply.push_str(&token);
                        on_token(&token);
                    }
                    StreamFrame::Done => break 'read,
                    StreamFrame::Error(error) => return Err(BackendError::Remote(error)),
                    StreamFrame::Ignored => {}
                }
            }
        }
        if let Some(event) = decoder.finish() {
            if let StreamFrame::Token(token) = StreamFrame::from(&event) {
                reply.push_str(&token);
                on_token(&token);
            }
        }

        debug!(chars = reply.chars().count(), "stream finished");
        Ok(reply)
    }

    pub async fn clear_history(&self) -> Result<(), BackendError> {
        Self::send(self.post("/chat/clear").json(&serde_json::json!({}))).await.map(|_| ())
    }

    /// `POST /tts`, returning WAV bytes.
    pub async fn tts(&self, text: &str) -> Result<Vec<u8>, BackendError> {
        let response = Self::send(self.post("/tts").json(&TtsRequest { text })).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(BackendError::Malformed("empty audio".to_string()));
        }
        Ok(bytes.to_vec())
    }

    /// `POST /stt` with base64 audio. Fallback path; the platform recognizer
    /// is primary.
    pub async fn stt(&self, audio: &[u8], sample_rate: u32) -> Result<String, BackendError> {
        let request = SttRequest {
            audio_base64: base64::engine::general_purpose::STANDARD.encode(audio),
            sample_rate,
        };
        let body = Self::send_json(self.post("/stt").json(&request)).await?;
        transcript_from(&body).ok_or_else(|| BackendError::Malformed("no transcript".to_string()))
    }

    /// `GET /durum`
    pub async fn status(&self) -> Result<DeviceStatus, BackendError> {
        let body = Self::send_json(self.get("/durum")).await?;
        Ok(DeviceStatus::from_value(&body))
    }

    pub async fn light(&self, command: &LightCommand) -> Result<CommandAck, BackendError> {
        self.control(command.route()).await
    }

    pub async fn tv(&self, command: &TvCommand) -> Result<CommandAck, BackendError> {
        self.control(command.route()).await
    }

    async fn control(&self, route: Route) -> Result<CommandAck, BackendError> {
        let request = match route {
            Route::Get(path) => self.get(path),
            Route::Post(path, body) => self.post(path).json(&body),
        };
        let ack = CommandAck::from_value(&Self::send_json(request).await?);
        if !ack.success {
            warn!(message = ?ack.message, "device command rejected");
        }
        Ok(ack)
    }
}
