//! Azure OpenAI LLM Gateway implementation

use super::error::AzureOpenAiError;
use super::settings::{AzureOpenAiSettings, ModelProfile};
use super::sse::{DONE_SENTINEL, SseDecoder};
use super::types::{
    ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, ResponseFormat, WireMessage,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tutor_relay_application::{GatewayError, LlmGateway, StreamHandle};
use tutor_relay_domain::{Message, StreamEvent, StructuredOutput};

/// Bound on establishing the TCP/TLS connection. Overall call time is
/// bounded by the caller.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fragments buffered between the upstream reader and the consumer.
const STREAM_BUFFER: usize = 64;

/// LLM Gateway implementation for an Azure OpenAI deployment
pub struct AzureOpenAiGateway {
    http: reqwest::Client,
    settings: Arc<AzureOpenAiSettings>,
}

impl AzureOpenAiGateway {
    pub fn new(settings: AzureOpenAiSettings) -> Result<Self, AzureOpenAiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        info!(
            endpoint = %settings.endpoint,
            chat = %settings.chat.deployment,
            structured = %settings.structured.deployment,
            streaming = settings.streaming,
            "AzureOpenAiGateway initialized"
        );

        Ok(Self {
            http,
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &AzureOpenAiSettings {
        &self.settings
    }

    async fn post(
        &self,
        profile: &ModelProfile,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<reqwest::Response, AzureOpenAiError> {
        let url = self.settings.completions_url(&profile.deployment);
        debug!(deployment = %profile.deployment, stream = body.stream, "POST chat/completions");

        let response = self
            .http
            .post(url)
            .header("api-key", &self.settings.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            return Err(AzureOpenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn open_stream(&self, messages: &[Message]) -> Result<StreamHandle, AzureOpenAiError> {
        let profile = &self.settings.chat;
        let request = ChatCompletionRequest {
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: profile.temperature,
            stream: self.settings.streaming,
            response_format: None,
        };

        let response = self.post(profile, &request).await?;

        if !self.settings.streaming {
            let text = response.json::<ChatCompletion>().await?.into_text()?;
            let (tx, rx) = mpsc::channel(1);
            // Capacity 1 and a single event.
            let _ = tx.try_send(StreamEvent::Completed(text));
            return Ok(StreamHandle::new(rx));
        }

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(forward_stream(response, tx));
        Ok(StreamHandle::new(rx))
    }

    async fn request_structured(&self, prompt: &str) -> Result<StructuredOutput, AzureOpenAiError> {
        let profile = &self.settings.structured;
        let message = Message::human(prompt);
        let request = ChatCompletionRequest {
            messages: vec![WireMessage::from(&message)],
            temperature: profile.temperature,
            stream: false,
            response_format: Some(ResponseFormat::strict_schema(
                StructuredOutput::SCHEMA_NAME,
                StructuredOutput::json_schema(),
            )),
        };

        let content = self
            .post(profile, &request)
            .await?
            .json::<ChatCompletion>()
            .await?
            .into_text()?;

        serde_json::from_str(&content).map_err(|e| AzureOpenAiError::Schema(e.to_string()))
    }
}

#[async_trait]
impl LlmGateway for AzureOpenAiGateway {
    async fn stream_complete(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        Ok(self.open_stream(messages).await?)
    }

    async fn structured_complete(&self, prompt: &str) -> Result<StructuredOutput, GatewayError> {
        Ok(self.request_structured(prompt).await?)
    }
}

/// Outcome of one `data:` payload.
enum ChunkOutcome {
    Text(String),
    Skip,
    Done,
}

fn parse_stream_data(data: &str) -> Result<ChunkOutcome, AzureOpenAiError> {
    if data.trim() == DONE_SENTINEL {
        return Ok(ChunkOutcome::Done);
    }
    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| AzureOpenAiError::MalformedEvent(format!("{}: {}", e, data)))?;
    Ok(match chunk.into_delta()? {
        Some(text) if !text.is_empty() => ChunkOutcome::Text(text),
        _ => ChunkOutcome::Skip,
    })
}

/// Read the upstream SSE body and forward fragments until `[DONE]`, an
/// error, or the consumer going away. Returning drops the response, which
/// aborts the upstream request.
async fn forward_stream(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    let mut upstream = response.bytes_stream();
    let mut decoder = SseDecoder::new();
    let mut full_text = String::new();

    macro_rules! handle {
        ($data:expr) => {
            match parse_stream_data(&$data) {
                Ok(ChunkOutcome::Text(text)) => {
                    full_text.push_str(&text);
                    if tx.send(StreamEvent::Delta(text)).await.is_err() {
                        debug!("Stream consumer dropped; aborting upstream request");
                        return;
                    }
                }
                Ok(ChunkOutcome::Skip) => {}
                Ok(ChunkOutcome::Done) => {
                    let _ = tx.send(StreamEvent::Completed(full_text)).await;
                    return;
                }
                Err(e) => {
                    warn!("Provider stream failed: {}", e);
                    let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                    return;
                }
            }
        };
    }

    while let Some(chunk) = upstream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("Provider stream interrupted: {}", e);
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
        };

        decoder.push(&chunk);
        while let Some(data) = decoder.next_data() {
            handle!(data);
        }
    }

    if let Some(data) = decoder.finish() {
        handle!(data);
    }

    debug!("Provider stream ended without [DONE]");
    let _ = tx.send(StreamEvent::Completed(full_text)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and return the raw request received.
    async fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        body: String,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 4096];
        loop {
            let n = socket.read(&mut tmp).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&tmp[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn settings(endpoint: String, streaming: bool) -> AzureOpenAiSettings {
        AzureOpenAiSettings {
            endpoint,
            api_key: "test-key".to_string(),
            api_version: "2024-08-01-preview".to_string(),
            chat: ModelProfile {
                deployment: "chat-deploy".to_string(),
                temperature: 0.7,
            },
            structured: ModelProfile {
                deployment: "structured-deploy".to_string(),
                temperature: 0.2,
            },
            streaming,
        }
    }

    fn sse_chunk(text: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"index": 0, "delta": {"content": text}}]})
        )
    }

    #[tokio::test]
    async fn test_stream_complete_forwards_fragments() {
        let body = format!(
            "data: {{\"choices\":[],\"prompt_filter_results\":[]}}\n\n{}{}data: [DONE]\n\n",
            sse_chunk("Hello"),
            sse_chunk(" world")
        );
        let (endpoint, server) = serve_once("200 OK", "text/event-stream", body).await;
        let gateway = AzureOpenAiGateway::new(settings(endpoint, true)).unwrap();

        let mut handle = gateway
            .stream_complete(&[Message::system("sys"), Message::human("hi")])
            .await
            .unwrap();

        assert_eq!(handle.next().await, Some(StreamEvent::Delta("Hello".to_string())));
        assert_eq!(handle.next().await, Some(StreamEvent::Delta(" world".to_string())));
        assert_eq!(
            handle.next().await,
            Some(StreamEvent::Completed("Hello world".to_string()))
        );

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "POST /openai/deployments/chat-deploy/chat/completions?api-version=2024-08-01-preview"
        ));
        assert!(request.to_ascii_lowercase().contains("api-key: test-key"));
        assert!(request.contains("\"stream\":true"));
        assert!(request.contains("\"role\":\"system\""));
    }

    #[tokio::test]
    async fn test_stream_complete_malformed_chunk_yields_error_event() {
        let body = format!("{}data: {{not json\n\n", sse_chunk("Hi"));
        let (endpoint, _server) = serve_once("200 OK", "text/event-stream", body).await;
        let gateway = AzureOpenAiGateway::new(settings(endpoint, true)).unwrap();

        let mut handle = gateway.stream_complete(&[Message::human("hi")]).await.unwrap();
        assert_eq!(handle.next().await, Some(StreamEvent::Delta("Hi".to_string())));
        assert!(matches!(handle.next().await, Some(StreamEvent::Error(_))));
    }

    #[tokio::test]
    async fn test_stream_complete_http_error_fails_to_open() {
        let (endpoint, _server) = serve_once(
            "401 Unauthorized",
            "application/json",
            r#"{"error":{"message":"bad key"}}"#.to_string(),
        )
        .await;
        let gateway = AzureOpenAiGateway::new(settings(endpoint, true)).unwrap();

        let err = gateway
            .stream_complete(&[Message::human("hi")])
            .await
            .err()
            .unwrap();
        match err {
            GatewayError::RequestFailed(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("bad key"));
            }
            other => panic!("Expected RequestFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_streaming_mode_delivers_completed_text() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Whole answer"}}]}"#;
        let (endpoint, server) =
            serve_once("200 OK", "application/json", body.to_string()).await;
        let gateway = AzureOpenAiGateway::new(settings(endpoint, false)).unwrap();

        let mut handle = gateway.stream_complete(&[Message::human("hi")]).await.unwrap();
        assert_eq!(
            handle.next().await,
            Some(StreamEvent::Completed("Whole answer".to_string()))
        );

        let request = server.await.unwrap();
        assert!(!request.contains("\"stream\""));
    }

    #[tokio::test]
    async fn test_structured_complete_parses_schema() {
        let content = serde_json::json!({
            "main_response": "",
            "follow_up_questions": ["What is ownership?", "How do lifetimes work?"]
        })
        .to_string();
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string();
        let (endpoint, server) = serve_once("200 OK", "application/json", body).await;
        let gateway = AzureOpenAiGateway::new(settings(endpoint, true)).unwrap();

        let output = gateway.structured_complete("suggest").await.unwrap();
        assert_eq!(
            output.follow_up_questions,
            Some(vec![
                "What is ownership?".to_string(),
                "How do lifetimes work?".to_string()
            ])
        );

        let request = server.await.unwrap();
        assert!(request.contains("/openai/deployments/structured-deploy/"));
        assert!(request.contains("\"json_schema\""));
        assert!(request.contains("\"strict\":true"));
        assert!(request.contains("follow_up_suggestions"));
    }

    #[tokio::test]
    async fn test_structured_complete_schema_mismatch() {
        let content = r#"{"follow_up_questions": [1, 2]}"#;
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string();
        let (endpoint, _server) = serve_once("200 OK", "application/json", body).await;
        let gateway = AzureOpenAiGateway::new(settings(endpoint, true)).unwrap();

        let err = gateway.structured_complete("suggest").await.unwrap_err();
        assert!(matches!(err, GatewayError::SchemaMismatch(_)));
    }

    #[test]
    fn test_parse_stream_data() {
        assert!(matches!(parse_stream_data("[DONE]"), Ok(ChunkOutcome::Done)));
        assert!(matches!(
            parse_stream_data(r#"{"choices":[{"delta":{"content":""}}]}"#),
            Ok(ChunkOutcome::Skip)
        ));
        assert!(matches!(
            parse_stream_data("garbage"),
            Err(AzureOpenAiError::MalformedEvent(_))
        ));
    }
}
