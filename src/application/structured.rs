//! Structured LLM calls: JSON extraction plus a single bounded retry.
//!
//! Models wrap JSON in code fences or chatter around it; `extract_json`
//! digs the object out before parsing. A parse failure earns exactly one
//! retry at an adjusted temperature, after which the error propagates so
//! the caller can fall back to its rule-based default.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::ports::{ChatRequest, LanguageModel, LlmError};

/// Runs a completion expected to return JSON matching `T`.
///
/// Transport errors propagate untouched. A malformed body is retried
/// once at `retry_temperature`, then reported as a parse error.
pub async fn complete_structured<T: DeserializeOwned>(
    llm: &dyn LanguageModel,
    request: ChatRequest,
    retry_temperature: f32,
) -> Result<T, LlmError> {
    let completion = llm.complete(request.clone()).await?;
    match parse_payload::<T>(&completion.content) {
        Ok(value) => Ok(value),
        Err(first_error) => {
            warn!(error = %first_error, "structured completion parse failed, retrying once");
            let retry = request.with_temperature(retry_temperature);
            let completion = llm.complete(retry).await?;
            parse_payload::<T>(&completion.content).map_err(LlmError::parse)
        }
    }
}

fn parse_payload<T: DeserializeOwned>(content: &str) -> Result<T, String> {
    let json = extract_json(content).ok_or_else(|| "no JSON object in response".to_string())?;
    serde_json::from_str(json).map_err(|e| e.to_string())
}

/// Cuts the JSON object out of a completion body.
///
/// Handles fenced blocks and leading or trailing prose by slicing from
/// the first `{` to the last `}`.
pub fn extract_json(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    let start = inner.find('{')?;
    let end = inner.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&inner[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::llm::{MockError, MockLanguageModel};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        crisis: bool,
        confidence: f32,
    }

    fn request() -> ChatRequest {
        ChatRequest::new().with_user("判断这句话").with_temperature(0.2)
    }

    #[test]
    fn extract_json_handles_fences_and_prose() {
        assert_eq!(
            extract_json("```json\n{\"a\": 1}\n```"),
            Some("{\"a\": 1}")
        );
        assert_eq!(
            extract_json("好的，结果如下：{\"a\": 1} 希望有帮助"),
            Some("{\"a\": 1}")
        );
        assert_eq!(extract_json("没有任何结构"), None);
    }

    #[tokio::test]
    async fn clean_json_parses_on_the_first_call() {
        let llm = MockLanguageModel::new()
            .with_response(r#"{"crisis": false, "confidence": 0.9}"#);

        let verdict: Verdict = complete_structured(&llm, request(), 0.5).await.unwrap();

        assert!(!verdict.crisis);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn parse_failure_retries_once_at_the_adjusted_temperature() {
        let llm = MockLanguageModel::new()
            .with_response("抱歉，我无法判断。")
            .with_response(r#"{"crisis": true, "confidence": 0.8}"#);

        let verdict: Verdict = complete_structured(&llm, request(), 0.5).await.unwrap();

        assert!(verdict.crisis);
        let calls = llm.get_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].temperature, Some(0.2));
        assert_eq!(calls[1].temperature, Some(0.5));
    }

    #[tokio::test]
    async fn two_bad_bodies_surface_a_parse_error() {
        let llm = MockLanguageModel::new()
            .with_response("not json")
            .with_response("still not json");

        let result: Result<Verdict, _> = complete_structured(&llm, request(), 0.5).await;

        assert!(matches!(result, Err(LlmError::Parse(_))));
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn transport_errors_propagate_without_retry() {
        let llm = MockLanguageModel::new().with_error(MockError::Timeout { timeout_secs: 30 });

        let result: Result<Verdict, _> = complete_structured(&llm, request(), 0.5).await;

        assert!(matches!(result, Err(LlmError::Timeout { .. })));
        assert_eq!(llm.call_count(), 1);
    }
}
