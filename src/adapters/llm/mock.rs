//! Mock language model for testing.
//!
//! Lets tests script completions without calling a real endpoint.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ChatCompletion, ChatRequest, LanguageModel, LlmError};

/// Mock language model for testing.
///
/// Configurable to return specific responses, simulate delays, or inject errors.
#[derive(Debug, Clone, Default)]
pub struct MockLanguageModel {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion.
    Success(String),
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u64 },
}

impl From<MockError> for LlmError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => LlmError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => LlmError::unavailable(message),
            MockError::AuthenticationFailed => LlmError::AuthenticationFailed,
            MockError::Network { message } => LlmError::network(message),
            MockError::Timeout { timeout_secs } => LlmError::Timeout { timeout_secs },
        }
    }
}

impl MockLanguageModel {
    /// Creates a new mock with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        let mut responses = self.responses.lock().unwrap();
        responses.push_back(MockResponse::Success(content.into()));
        drop(responses);
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        let mut responses = self.responses.lock().unwrap();
        responses.push_back(MockResponse::Error(error));
        drop(responses);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this model.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success("Mock response".to_string()))
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, LlmError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success(content) => Ok(ChatCompletion {
                content,
                model: "mock-model".to_string(),
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request() -> ChatRequest {
        ChatRequest::new().with_user("你好")
    }

    #[tokio::test]
    async fn mock_returns_configured_response() {
        let model = MockLanguageModel::new().with_response("听起来最近不容易。");

        let completion = model.complete(test_request()).await.unwrap();

        assert_eq!(completion.content, "听起来最近不容易。");
        assert_eq!(completion.model, "mock-model");
    }

    #[tokio::test]
    async fn mock_returns_responses_in_order() {
        let model = MockLanguageModel::new()
            .with_response("First")
            .with_response("Second")
            .with_response("Third");

        let r1 = model.complete(test_request()).await.unwrap();
        let r2 = model.complete(test_request()).await.unwrap();
        let r3 = model.complete(test_request()).await.unwrap();

        assert_eq!(r1.content, "First");
        assert_eq!(r2.content, "Second");
        assert_eq!(r3.content, "Third");
    }

    #[tokio::test]
    async fn mock_returns_default_after_exhausted() {
        let model = MockLanguageModel::new().with_response("Only one");

        let r1 = model.complete(test_request()).await.unwrap();
        let r2 = model.complete(test_request()).await.unwrap();

        assert_eq!(r1.content, "Only one");
        assert_eq!(r2.content, "Mock response");
    }

    #[tokio::test]
    async fn mock_returns_configured_error() {
        let model = MockLanguageModel::new()
            .with_error(MockError::RateLimited { retry_after_secs: 30 });

        let result = model.complete(test_request()).await;

        let err = result.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, LlmError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn mock_tracks_calls() {
        let model = MockLanguageModel::new()
            .with_response("Response 1")
            .with_response("Response 2");

        assert_eq!(model.call_count(), 0);

        model.complete(test_request()).await.unwrap();
        assert_eq!(model.call_count(), 1);

        model.complete(test_request()).await.unwrap();
        assert_eq!(model.call_count(), 2);

        model.clear_calls();
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn mock_records_request_content() {
        let model = MockLanguageModel::new().with_response("ok");

        model
            .complete(ChatRequest::new().with_user("最近睡不好"))
            .await
            .unwrap();

        let calls = model.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].messages[0].content, "最近睡不好");
    }

    #[tokio::test]
    async fn mock_respects_delay() {
        let model = MockLanguageModel::new()
            .with_response("Delayed")
            .with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        model.complete(test_request()).await.unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(50));
    }
}
