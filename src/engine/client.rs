use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;

use super::ChatEngine;
use super::sse_parser::sse_to_text_stream;
use crate::session::{Message, ParamSnapshot};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    stream: bool,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionClient {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatEngine for CompletionClient {
    async fn complete(&self, transcript: &[Message], params: ParamSnapshot) -> Result<String> {
        let url = self.completions_url();

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            messages: transcript,
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stream: true,
        };

        let mut http_request = self.client.post(&url).json(&chat_request);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        tracing::debug!(
            %url,
            model = %self.model,
            messages = transcript.len(),
            "sending chat completion request"
        );

        let response = http_request
            .send()
            .await
            .with_context(|| format!("Failed to connect to API endpoint: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed with status {status}: {body}");
        }

        let mut stream = std::pin::pin!(sse_to_text_stream(response.bytes_stream()));
        let mut reply = String::new();

        while let Some(chunk) = stream.next().await {
            reply.push_str(&chunk?);
        }

        tracing::debug!(chars = reply.len(), "chat completion finished");
        Ok(reply)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn request_complete(request: &[u8]) -> bool {
        let Some(header_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
        let body_len = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + body_len
    }

    /// Serves one request with a `200 text/event-stream` carrying `body`.
    async fn serve_stream(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}")
    }

    async fn complete_against(body: &'static str) -> Result<String> {
        let endpoint = serve_stream(body).await;
        let client = CompletionClient::new(endpoint, "llama3:8b".to_string(), None);
        let params = crate::session::ParameterSet::default().snapshot();
        client.complete(&[Message::user("hi")], params).await
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let client = CompletionClient::new(
            "http://localhost:11434/".to_string(),
            "llama3:8b".to_string(),
            None,
        );
        assert_eq!(
            client.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let transcript = vec![Message::system("Be a pirate."), Message::user("hi")];
        let request = ChatCompletionRequest {
            model: "llama3:8b",
            messages: &transcript,
            temperature: 0.5,
            top_p: 0.9,
            max_tokens: 120,
            stream: true,
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama3:8b");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["top_p"], 0.9);
        assert_eq!(json["max_tokens"], 120);
        assert_eq!(json["stream"], true);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let client = CompletionClient::new(
            "http://127.0.0.1:9".to_string(),
            "llama3:8b".to_string(),
            None,
        );
        let params = crate::session::ParameterSet::default().snapshot();

        let result = client.complete(&[Message::user("hi")], params).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_streamed_reply_is_accumulated() {
        let reply = complete_against(concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Ahoy\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\", matey\"}}]}\n\n",
            "data: [DONE]\n\n",
        ))
        .await
        .unwrap();

        assert_eq!(reply, "Ahoy, matey");
    }

    #[tokio::test]
    async fn test_well_formed_empty_stream_is_an_empty_reply() {
        let reply = complete_against(concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: [DONE]\n\n",
        ))
        .await
        .unwrap();

        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn test_error_event_in_stream_is_an_error() {
        let err = complete_against(
            "data: {\"error\":{\"message\":\"model not loaded\"}}\n\ndata: garbage\n\n",
        )
        .await
        .unwrap_err();

        assert!(format!("{err:#}").contains("model not loaded"));
    }

    #[tokio::test]
    async fn test_garbled_stream_is_an_error() {
        let result = complete_against("data: garbage\n\n").await;

        assert!(result.is_err());
    }
}
