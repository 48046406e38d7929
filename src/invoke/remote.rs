// Remote executor - HTTP client for the playground's POST /api/run

use crate::invoke::config::InvokeConfig;
use crate::invoke::error::{InvokeError, Result};
use crate::invoke::types::{ExecutionRequest, Operation, RawResult, RunRequest, RunResponse, Source};
use crate::invoke::Invoker;
use crate::locator::{ExecutorKind, ExecutorTarget, RemoteSettings, resolve_remote};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Header carrying the credential
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Invoker for the remote playground
#[derive(Clone)]
pub struct RemoteInvoker {
    settings: RemoteSettings,
    client: Client,
    max_response_bytes: usize,
}

impl RemoteInvoker {
    pub fn new(settings: RemoteSettings, config: &InvokeConfig) -> Result<Self> {
        info!(
            endpoint = %settings.endpoint,
            timeout_secs = config.request_timeout_secs,
            max_response_bytes = config.max_response_bytes,
            "initializing remote invoker"
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(InvokeError::ClientError)?;

        Ok(Self {
            settings,
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    async fn send(
        &self,
        url: &str,
        code: &str,
        credential: Option<&str>,
    ) -> Result<(u16, RunResponse)> {
        debug!(url = %url, code_bytes = code.len(), has_key = credential.is_some(), "sending HTTP request");

        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&RunRequest { code });

        if let Some(key) = credential {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let mut response = builder.send().await?;
        let status = response.status().as_u16();
        debug!(status = status, "received HTTP response");

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(InvokeError::ResponseTooLarge(self.max_response_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        let payload: RunResponse = serde_json::from_slice(&body)?;
        Ok((status, payload))
    }
}

#[async_trait]
impl Invoker for RemoteInvoker {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::Remote
    }

    async fn invoke(&self, request: &ExecutionRequest) -> RawResult {
        if request.operation != Operation::Run {
            return RawResult::unresolved(format!(
                "The playground only runs code; '{}' needs the local tool.",
                request.operation
            ));
        }

        let code = match &request.source {
            Source::Inline(code) => code.clone(),
            Source::File(file) => match tokio::fs::read_to_string(file.path()).await {
                Ok(code) => code,
                Err(e) => return RawResult::transport(InvokeError::SourceUnreadable(e).to_string()),
            },
        };

        let ExecutorTarget::Remote { endpoint_url } = resolve_remote(&self.settings) else {
            return RawResult::unresolved("No playground endpoint configured.");
        };

        let start = Instant::now();
        match self
            .send(&endpoint_url, &code, request.credential_header())
            .await
        {
            Ok((status, payload)) => {
                info!(
                    status = status,
                    success = payload.success,
                    timed_out = payload.timed_out,
                    truncated = payload.truncated,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "playground call completed"
                );
                RawResult::http(status, payload)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "playground call failed"
                );
                RawResult::transport(e.to_string())
            }
        }
    }
}
