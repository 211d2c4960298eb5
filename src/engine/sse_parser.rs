//! Server-Sent Events (SSE) parser for OpenAI-compatible streaming responses.

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<StreamFailure>,
}

/// An error event sent inside an otherwise successful stream.
///
/// OpenAI-compatible servers send `{"error":{"message":...}}`; Ollama may
/// send `{"error":"..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StreamFailure {
    Detailed { message: String },
    Plain(String),
}

impl StreamFailure {
    fn message(&self) -> &str {
        match self {
            Self::Detailed { message } | Self::Plain(message) => message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// Converts a raw SSE byte stream into a stream of text chunks.
///
/// Lines are buffered across network chunks. The stream ends at
/// `data: [DONE]` or when the body ends. A transport error, an error event or
/// a payload that is not a completion chunk ends it with an error.
pub fn sse_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {e}"));
                    return;
                }
            };

            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(line_end) = buffer.find('\n') {
                let line: String = buffer.drain(..=line_end).collect();
                let line = line.trim();

                if is_done(line) {
                    return;
                }
                match parse_sse_line(line) {
                    Ok(Some(content)) => yield Ok(content),
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        // A final event without a trailing newline.
        match parse_sse_line(buffer.trim()) {
            Ok(Some(content)) => yield Ok(content),
            Ok(None) => {}
            Err(e) => yield Err(e),
        }
    }
}

fn data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn is_done(line: &str) -> bool {
    data_payload(line) == Some("[DONE]")
}

/// Extracts the text content of one trimmed SSE line.
///
/// Returns `Ok(None)` for non-data lines, comments, `[DONE]` and empty
/// deltas. A data payload that is not a completion chunk, or that carries an
/// `error` object, is an error.
///
/// ```ignore
/// let line = r#"data: {"choices":[{"delta":{"content":"Ahoy"}}]}"#;
/// assert_eq!(parse_sse_line(line).unwrap(), Some("Ahoy".to_string()));
/// ```
fn parse_sse_line(line: &str) -> Result<Option<String>> {
    let Some(json_str) = data_payload(line) else {
        return Ok(None);
    };
    if json_str.is_empty() || json_str == "[DONE]" {
        return Ok(None);
    }

    let response = serde_json::from_str::<StreamResponse>(json_str)
        .with_context(|| format!("Malformed stream event: {json_str}"))?;

    if let Some(failure) = response.error {
        bail!("Server reported an error: {}", failure.message());
    }

    let content: String = response
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .collect();

    Ok((!content.is_empty()).then_some(content))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::{StreamExt, stream};

    #[test]
    fn test_parse_sse_line_with_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), Some("Hello".to_string()));
    }

    #[test]
    fn test_parse_sse_line_without_space_after_colon() {
        let line = r#"data:{"choices":[{"delta":{"content":"Hi"}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), Some("Hi".to_string()));
    }

    #[test]
    fn test_parse_sse_line_with_role_only_delta() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), None);
    }

    #[test]
    fn test_parse_sse_line_multiple_choices() {
        let line =
            r#"data: {"choices":[{"delta":{"content":"Arr"}},{"delta":{"content":", matey"}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), Some("Arr, matey".to_string()));
    }

    #[test]
    fn test_parse_sse_line_ignores_non_data() {
        assert_eq!(parse_sse_line("").unwrap(), None);
        assert_eq!(parse_sse_line(": keep-alive").unwrap(), None);
        assert_eq!(parse_sse_line("event: message").unwrap(), None);
        assert_eq!(parse_sse_line("data: [DONE]").unwrap(), None);
    }

    #[test]
    fn test_parse_sse_line_rejects_garbage_payload() {
        let err = parse_sse_line("data: not json").unwrap_err();
        assert!(err.to_string().contains("Malformed stream event"));
    }

    #[test]
    fn test_parse_sse_line_surfaces_error_events() {
        let detailed = r#"data: {"error":{"message":"model not loaded"}}"#;
        let err = parse_sse_line(detailed).unwrap_err();
        assert!(err.to_string().contains("model not loaded"));

        let plain = r#"data: {"error":"out of memory"}"#;
        let err = parse_sse_line(plain).unwrap_err();
        assert!(err.to_string().contains("out of memory"));
    }

    fn bytes_stream(parts: &[&'static str]) -> impl Stream<Item = reqwest::Result<Bytes>> + Send {
        let items: Vec<reqwest::Result<Bytes>> = parts
            .iter()
            .map(|p| Ok(Bytes::from_static(p.as_bytes())))
            .collect();
        stream::iter(items)
    }

    #[tokio::test]
    async fn test_stream_reassembles_split_lines() {
        let input = bytes_stream(&[
            "data: {\"choices\":[{\"delta\":{\"con",
            "tent\":\"Ahoy\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\" there\"}}]}\n",
            "data: [DONE]\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n",
        ]);

        let chunks: Vec<String> = sse_to_text_stream(input)
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(chunks, vec!["Ahoy", " there"]);
    }

    #[tokio::test]
    async fn test_stream_flushes_trailing_event() {
        let input = bytes_stream(&["data: {\"choices\":[{\"delta\":{\"content\":\"end\"}}]}"]);

        let chunks: Vec<String> = sse_to_text_stream(input)
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(chunks, vec!["end"]);
    }

    #[tokio::test]
    async fn test_stream_stops_at_error_event() {
        let input = bytes_stream(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"Ahoy\"}}]}\n",
            "data: {\"error\":{\"message\":\"model not loaded\"}}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lost\"}}]}\n",
        ]);

        let items: Vec<Result<String>> = sse_to_text_stream(input).collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "Ahoy");
        assert!(items[1].is_err());
    }
}
