//! Gemini `generateContent` client.
//!
//! Sends the request as JSON with the key in the `x-goog-api-key` header.
//! Single-shot mode waits for the whole reply; streaming mode reads
//! `streamGenerateContent?alt=sse` and re-parses the accumulated text after
//! every event, delivering sections as they grow.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use inkwell_core::AnalysisResults;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::callbacks::{AnalysisCallbacks, CallbackGuard};
use crate::client::AnalysisClient;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::request::AnalysisRequest;
use crate::response::parse_sections;
use crate::sse::SseDecoder;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Asynchronous Gemini client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    config: AnalysisConfig,
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the HTTP client fails to build.
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("inkwell/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient { http, config }),
        })
    }

    /// Create a client from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the HTTP client
    /// fails to build.
    pub fn from_env() -> AnalysisResult<Self> {
        Self::new(AnalysisConfig::from_env()?)
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.inner.config
    }

    async fn send(&self, request: &AnalysisRequest, streaming: bool) -> AnalysisResult<Response> {
        let url = self.inner.config.endpoint(streaming)?;
        let response = self
            .inner
            .http
            .post(url)
            .header(API_KEY_HEADER, self.inner.config.api_key())
            .json(request)
            .send()
            .await?;
        Ok(response)
    }

    async fn read_single(response: Response, guard: &CallbackGuard<'_>) -> AnalysisResult<()> {
        let reply: GenerateContentResponse = response.json().await?;
        reply.check_blocked()?;

        let text = reply.text();
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        guard.report(&parse_sections(&text));
        guard.raw(&text);
        Ok(())
    }

    async fn read_stream(response: Response, guard: &CallbackGuard<'_>) -> AnalysisResult<()> {
        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut reply = StreamedReply::default();

        while let Some(chunk) = body.next().await {
            for payload in decoder.push(&chunk?) {
                reply.absorb(&payload, guard)?;
            }
        }
        for payload in decoder.finish() {
            reply.absorb(&payload, guard)?;
        }

        debug!(events = reply.events, chars = reply.text.len(), "Stream finished");
        if reply.text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        guard.raw(&reply.text);
        Ok(())
    }
}

/// Text accumulated from a stream and the sections already delivered.
#[derive(Default)]
struct StreamedReply {
    text: String,
    delivered: AnalysisResults,
    events: usize,
}

impl StreamedReply {
    fn absorb(&mut self, payload: &str, guard: &CallbackGuard<'_>) -> AnalysisResult<()> {
        let chunk: GenerateContentResponse = serde_json::from_str(payload)?;
        chunk.check_blocked()?;
        self.text.push_str(&chunk.text());
        self.events += 1;
        guard.report_changes(&parse_sections(&self.text), &mut self.delivered);
        Ok(())
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        callbacks: &dyn AnalysisCallbacks,
    ) -> AnalysisResult<()> {
        let streaming = self.inner.config.streaming;
        info!(
            request_id = %request.id,
            model = %self.inner.config.model,
            streaming,
            "Sending analysis request"
        );

        // Nothing has reached the model yet: report to the caller only.
        let response = self.send(request, streaming).await?;

        let guard = CallbackGuard::new(callbacks);
        let status = response.status();
        let outcome = if status.is_success() {
            if streaming {
                Self::read_stream(response, &guard).await
            } else {
                Self::read_single(response, &guard).await
            }
        } else {
            let body = response
                .text()
                .await
                .inspect_err(|error| debug!(%error, "Failed to read error body"))
                .unwrap_or_default();
            Err(api_error(status.as_u16(), &body))
        };

        match outcome {
            Ok(()) => info!(request_id = %request.id, "Analysis complete"),
            Err(error) => {
                warn!(request_id = %request.id, %error, "Analysis failed");
                guard.error(&error);
            }
        }
        Ok(())
    }
}

fn api_error(status: u16, body: &str) -> AnalysisError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    AnalysisError::Api { status, message }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn check_blocked(&self) -> AnalysisResult<()> {
        match self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            Some(reason) => Err(AnalysisError::Blocked(reason.clone())),
            None => Ok(()),
        }
    }
}
