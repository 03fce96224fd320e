//! HTTP handlers for check-in endpoints
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::str::FromStr;

use crate::application::handlers::{
    ChatTurnCommand, ChatTurnError, ChatTurnHandler, GetConversationError, GetConversationHandler,
    GetConversationQuery, OpenConversationCommand, OpenConversationError, OpenConversationHandler,
    TurnConfig,
};
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, ExemplarIndex, LanguageModel, MemoryStore};

use super::dto::{
    ChatTurnRequest, ChatTurnResponse, ConversationViewResponse, ErrorResponse, GateDto,
    MessageView, OpenConversationResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub conversations: Arc<dyn ConversationStore>,
    pub memories: Arc<dyn MemoryStore>,
    pub llm: Arc<dyn LanguageModel>,
    pub exemplars: Arc<dyn ExemplarIndex>,
    pub turn_config: TurnConfig,
}

impl AppState {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        memories: Arc<dyn MemoryStore>,
        llm: Arc<dyn LanguageModel>,
        exemplars: Arc<dyn ExemplarIndex>,
        turn_config: TurnConfig,
    ) -> Self {
        Self {
            conversations,
            memories,
            llm,
            exemplars,
            turn_config,
        }
    }

    pub fn open_conversation_handler(&self) -> OpenConversationHandler {
        OpenConversationHandler::new(self.conversations.clone())
    }

    pub fn chat_turn_handler(&self) -> ChatTurnHandler {
        ChatTurnHandler::new(
            self.conversations.clone(),
            self.memories.clone(),
            self.llm.clone(),
            self.exemplars.clone(),
            self.turn_config.clone(),
        )
    }

    pub fn get_conversation_handler(&self) -> GetConversationHandler {
        GetConversationHandler::new(self.conversations.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Open a new check-in conversation
///
/// POST /checkin/conversations
pub async fn open_conversation(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let handler = app_state.open_conversation_handler();
    let result = handler
        .handle(OpenConversationCommand)
        .await
        .map_err(|e| match e {
            OpenConversationError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(msg)),
            ),
            OpenConversationError::Domain(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(err.to_string())),
            ),
        })?;

    let response = OpenConversationResponse {
        conversation_id: result.conversation_id.to_string(),
        greeting: result.greeting,
    };

    Ok::<_, (StatusCode, Json<ErrorResponse>)>((StatusCode::CREATED, Json(response)))
}

/// Send a chat turn in a conversation
///
/// POST /checkin/conversations/{conversation_id}/messages
pub async fn send_checkin_message(
    State(app_state): State<AppState>,
    Path(conversation_id): Path<String>,
    Json(req): Json<ChatTurnRequest>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let conversation_id = ConversationId::from_str(&conversation_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid conversation_id format")),
        )
    })?;

    if req.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Message cannot be empty")),
        ));
    }

    let cmd = ChatTurnCommand {
        conversation_id,
        message: req.message,
        emotion: req.emotion.map(|e| e.into_reading()),
    };

    let handler = app_state.chat_turn_handler();
    let result = handler.handle(cmd).await.map_err(|e| match e {
        ChatTurnError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(
                "Conversation",
                &conversation_id.to_string(),
            )),
        ),
        ChatTurnError::Storage(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        ),
        ChatTurnError::Domain(err) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(err.to_string())),
        ),
        ChatTurnError::ContractViolation(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(e.to_string())),
        ),
    })?;

    let response = ChatTurnResponse {
        reply: result.reply,
        route_type: result.route.label().to_string(),
        state: result.state,
        assessment_stage: result.stage,
        assistant_questions: result.assistant_questions,
        action_cards: result.action_cards,
        gate: GateDto {
            pass: result.gate.pass,
            fixed: result.gate.fixed,
            missing: result.gate.missing,
        },
    };

    Ok::<_, (StatusCode, Json<ErrorResponse>)>((StatusCode::OK, Json(response)))
}

/// Get the conversation view
///
/// GET /checkin/conversations/{conversation_id}
pub async fn get_conversation(
    State(app_state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let conversation_id = ConversationId::from_str(&conversation_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid conversation_id format")),
        )
    })?;

    let query = GetConversationQuery { conversation_id };

    let handler = app_state.get_conversation_handler();
    let result = handler.handle(query).await.map_err(|e| match e {
        GetConversationError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(
                "Conversation",
                &conversation_id.to_string(),
            )),
        ),
        GetConversationError::Storage(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        ),
    })?;

    let conversation = result.conversation;
    let messages: Vec<MessageView> = conversation
        .messages()
        .iter()
        .filter(|m| m.role().is_user_visible())
        .map(|m| MessageView {
            role: m.role(),
            content: m.content().to_string(),
        })
        .collect();

    let response = ConversationViewResponse {
        conversation_id: conversation.id().to_string(),
        state: conversation.state(),
        assessment_stage: conversation.stage(),
        message_count: messages.len(),
        messages,
    };

    Ok::<_, (StatusCode, Json<ErrorResponse>)>((StatusCode::OK, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::exemplars::InMemoryExemplarIndex;
    use crate::adapters::llm::MockLanguageModel;
    use crate::adapters::store::{InMemoryConversationStore, InMemoryMemoryStore};

    fn test_app_state(llm: MockLanguageModel) -> AppState {
        AppState {
            conversations: Arc::new(InMemoryConversationStore::new()),
            memories: Arc::new(InMemoryMemoryStore::new()),
            llm: Arc::new(llm),
            exemplars: Arc::new(InMemoryExemplarIndex::seeded()),
            turn_config: TurnConfig::default(),
        }
    }

    async fn opened_conversation_id(app_state: &AppState) -> String {
        let result = app_state
            .open_conversation_handler()
            .handle(OpenConversationCommand)
            .await
            .unwrap();
        result.conversation_id.to_string()
    }

    #[tokio::test]
    async fn open_conversation_succeeds() {
        let app_state = test_app_state(MockLanguageModel::new());

        let result = open_conversation(State(app_state)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn send_message_round_trips() {
        let app_state = test_app_state(
            MockLanguageModel::new()
                .with_response(r#"{"crisis": false, "confidence": 0.9, "reason": "闲聊"}"#)
                .with_response("今天过得怎么样？"),
        );
        let id = opened_conversation_id(&app_state).await;

        let req = ChatTurnRequest {
            message: "你好".to_string(),
            emotion: None,
        };

        let result = send_checkin_message(State(app_state), Path(id), Json(req)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn send_message_rejects_blank_input() {
        let app_state = test_app_state(MockLanguageModel::new());
        let id = opened_conversation_id(&app_state).await;

        let req = ChatTurnRequest {
            message: "   ".to_string(),
            emotion: None,
        };

        let result = send_checkin_message(State(app_state), Path(id), Json(req)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn send_message_rejects_malformed_id() {
        let app_state = test_app_state(MockLanguageModel::new());

        let req = ChatTurnRequest {
            message: "你好".to_string(),
            emotion: None,
        };

        let result =
            send_checkin_message(State(app_state), Path("not-a-uuid".to_string()), Json(req)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn get_conversation_returns_the_view() {
        let app_state = test_app_state(MockLanguageModel::new());
        let id = opened_conversation_id(&app_state).await;

        let result = get_conversation(State(app_state), Path(id)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn get_conversation_unknown_id_fails() {
        let app_state = test_app_state(MockLanguageModel::new());

        let result = get_conversation(
            State(app_state),
            Path(ConversationId::new().to_string()),
        )
        .await;
        assert!(result.is_err());
    }
}
