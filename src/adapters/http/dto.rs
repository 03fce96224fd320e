//! HTTP DTOs for check-in endpoints
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Role, TurnState};
use crate::domain::routing::EmotionReading;
use crate::domain::skills::ActionCard;
use crate::domain::socratic::AssessmentStage;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to send a chat turn in a conversation
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
    /// Emotion reading from the caller's affect classifier, if any.
    #[serde(default)]
    pub emotion: Option<EmotionDto>,
}

/// Emotion label with its intensity score on a 0-10 scale.
#[derive(Debug, Clone, Deserialize)]
pub struct EmotionDto {
    pub label: String,
    pub score: u8,
}

impl EmotionDto {
    pub fn into_reading(self) -> EmotionReading {
        EmotionReading::new(self.label, self.score)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for opening a conversation
#[derive(Debug, Clone, Serialize)]
pub struct OpenConversationResponse {
    pub conversation_id: String,
    pub greeting: String,
}

/// Response for a chat turn
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurnResponse {
    pub reply: String,
    pub route_type: String,
    pub state: TurnState,
    pub assessment_stage: AssessmentStage,
    pub assistant_questions: Vec<String>,
    pub action_cards: Vec<ActionCard>,
    pub gate: GateDto,
}

/// Contract-gate report attached to every turn
#[derive(Debug, Clone, Serialize)]
pub struct GateDto {
    pub pass: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

/// One visible message in the conversation view
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
}

/// Response for getting the conversation view
#[derive(Debug, Clone, Serialize)]
pub struct ConversationViewResponse {
    pub conversation_id: String,
    pub state: TurnState,
    pub assessment_stage: AssessmentStage,
    pub message_count: usize,
    pub messages: Vec<MessageView>,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_turn_request_without_emotion_deserializes() {
        let json = r#"{"message":"最近睡不好"}"#;
        let req: ChatTurnRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.message, "最近睡不好");
        assert!(req.emotion.is_none());
    }

    #[test]
    fn chat_turn_request_with_emotion_deserializes() {
        let json = r#"{"message":"很难受","emotion":{"label":"悲伤","score":8}}"#;
        let req: ChatTurnRequest = serde_json::from_str(json).unwrap();

        let emotion = req.emotion.unwrap();
        assert_eq!(emotion.label, "悲伤");
        assert_eq!(emotion.score, 8);
    }

    #[test]
    fn gate_dto_omits_empty_lists() {
        let gate = GateDto {
            pass: true,
            fixed: Vec::new(),
            missing: Vec::new(),
        };
        let json = serde_json::to_string(&gate).unwrap();

        assert_eq!(json, r#"{"pass":true}"#);
    }

    #[test]
    fn gate_dto_reports_repairs_and_misses() {
        let gate = GateDto {
            pass: false,
            fixed: vec!["原地站一会儿看看效果 -> 原地站1分钟".to_string()],
            missing: vec!["next_steps_lines is empty".to_string()],
        };
        let json = serde_json::to_string(&gate).unwrap();

        assert!(json.contains("fixed"));
        assert!(json.contains("missing"));
    }

    #[test]
    fn error_response_serialization() {
        let error = ErrorResponse::not_found("Conversation", "b9b3f53e");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains("NOT_FOUND"));
        assert!(json.contains("Conversation not found"));
    }

    #[test]
    fn turn_state_serializes_snake_case() {
        let response = ChatTurnResponse {
            reply: "你愿意多说一点吗？".to_string(),
            route_type: "assessment".to_string(),
            state: TurnState::AwaitingFollowup,
            assessment_stage: AssessmentStage::GapFollowup,
            assistant_questions: vec!["你愿意多说一点吗？".to_string()],
            action_cards: Vec::new(),
            gate: GateDto {
                pass: true,
                fixed: Vec::new(),
                missing: Vec::new(),
            },
        };
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""state":"awaiting_followup""#));
        assert!(json.contains(r#""assessment_stage":"gap_followup""#));
    }
}
