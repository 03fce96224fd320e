//! ChatTurnHandler - One user turn through the full dialogue pipeline.
//!
//! Every turn is screened for crisis while exemplar retrieval runs
//! beside it. A crisis verdict preempts everything else; otherwise the
//! turn is dispatched by conversation state: follow-up answers feed the
//! slot machinery, fresh turns are routed to support or assessment, and
//! a settled assessment produces the structured conclusion.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::application::handlers::memory_update::{MemoryUpdateCommand, MemoryUpdateHandler};
use crate::application::prompts;
use crate::application::safety::CrisisScreen;
use crate::domain::contract::{gate_crisis_reply, sanitize_cards, validate_reply, FixTable};
use crate::domain::conversation::{Conversation, Message, Role, TurnState};
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::domain::intake::{parse_slots, warrants_risk_question, IntakeInfo, ParseContext};
use crate::domain::routing::{classify_turn, EmotionReading};
use crate::domain::skills::{
    infer_tier, render_skills, select_skills, ActionCard, RiskTier, SkillRegistry, SkillSelection,
};
use crate::domain::socratic::{
    followup_turn, intake_turn, AssessmentStage, PolicyAction, SlotQuestion,
};
use crate::ports::{
    ChatRequest, ConversationStore, Exemplar, ExemplarIndex, LanguageModel, MemoryStore,
    MessageRole, StoreError,
};

/// Exemplars injected into the support prompt.
const EXEMPLAR_LIMIT: usize = 2;
/// Messages of history handed to the support completion.
const HISTORY_TAIL: usize = 8;

/// Turn tunables threaded in from configuration.
#[derive(Debug, Clone)]
pub struct TurnConfig {
    /// Budget for the semantic crisis classifier.
    pub classify_timeout: Duration,
    /// Temperature for the single structured-call retry.
    pub retry_temperature: f32,
    /// When set, a contract-gate failure rejects the turn instead of
    /// being logged.
    pub enforce_gate: bool,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            classify_timeout: Duration::from_secs(5),
            retry_temperature: 0.5,
            enforce_gate: false,
        }
    }
}

/// Command for one user turn.
#[derive(Debug, Clone)]
pub struct ChatTurnCommand {
    pub conversation_id: ConversationId,
    pub message: String,
    pub emotion: Option<EmotionReading>,
}

/// Route taken by the turn, as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRoute {
    Support,
    Assessment,
    Crisis,
}

impl TurnRoute {
    pub fn label(&self) -> &'static str {
        match self {
            TurnRoute::Support => "support",
            TurnRoute::Assessment => "assessment",
            TurnRoute::Crisis => "crisis",
        }
    }
}

/// Contract-gate outcome reported with the turn.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub pass: bool,
    /// Sanitizer repairs, as `before -> after` pairs.
    pub fixed: Vec<String>,
    pub missing: Vec<String>,
}

impl GateOutcome {
    /// Outcome for turns that produce no gated content.
    fn clean() -> Self {
        Self {
            pass: true,
            fixed: Vec::new(),
            missing: Vec::new(),
        }
    }
}

/// Result of a chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurnResult {
    pub reply: String,
    pub route: TurnRoute,
    pub state: TurnState,
    pub stage: AssessmentStage,
    pub assistant_questions: Vec<String>,
    pub action_cards: Vec<ActionCard>,
    pub gate: GateOutcome,
}

/// Error type for chat turns.
#[derive(Debug, Clone)]
pub enum ChatTurnError {
    /// Conversation not found
    NotFound(ConversationId),
    /// Storage error
    Storage(String),
    /// Domain error
    Domain(ValidationError),
    /// Contract gate failed while `enforce_gate` is set.
    ContractViolation(Vec<String>),
}

impl std::fmt::Display for ChatTurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatTurnError::NotFound(id) => write!(f, "Conversation not found: {}", id),
            ChatTurnError::Storage(err) => write!(f, "Storage error: {}", err),
            ChatTurnError::Domain(err) => write!(f, "{}", err),
            ChatTurnError::ContractViolation(missing) => {
                write!(f, "Output contract violated: {}", missing.join("; "))
            }
        }
    }
}

impl std::error::Error for ChatTurnError {}

impl From<StoreError> for ChatTurnError {
    fn from(err: StoreError) -> Self {
        ChatTurnError::Storage(err.to_string())
    }
}

impl From<ValidationError> for ChatTurnError {
    fn from(err: ValidationError) -> Self {
        ChatTurnError::Domain(err)
    }
}

/// Per-path pieces of the turn; state and stage are read off the
/// conversation after all mutations.
struct TurnOutcome {
    reply: String,
    route: TurnRoute,
    questions: Vec<String>,
    cards: Vec<ActionCard>,
    gate: GateOutcome,
}

impl TurnOutcome {
    fn plain(reply: String, route: TurnRoute) -> Self {
        Self {
            reply,
            route,
            questions: Vec::new(),
            cards: Vec::new(),
            gate: GateOutcome::clean(),
        }
    }
}

/// Handler for chat turns.
pub struct ChatTurnHandler {
    conversations: Arc<dyn ConversationStore>,
    memories: Arc<dyn MemoryStore>,
    llm: Arc<dyn LanguageModel>,
    exemplars: Arc<dyn ExemplarIndex>,
    registry: &'static SkillRegistry,
    fix_table: &'static FixTable,
    config: TurnConfig,
}

impl ChatTurnHandler {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        memories: Arc<dyn MemoryStore>,
        llm: Arc<dyn LanguageModel>,
        exemplars: Arc<dyn ExemplarIndex>,
        config: TurnConfig,
    ) -> Self {
        Self {
            conversations,
            memories,
            llm,
            exemplars,
            registry: SkillRegistry::embedded(),
            fix_table: FixTable::embedded(),
            config,
        }
    }

    pub async fn handle(&self, cmd: ChatTurnCommand) -> Result<ChatTurnResult, ChatTurnError> {
        let mut conversation = self
            .conversations
            .find(cmd.conversation_id)
            .await?
            .ok_or(ChatTurnError::NotFound(cmd.conversation_id))?;

        conversation.record_user_message(&cmd.message)?;

        let screen = CrisisScreen::new(
            self.llm.clone(),
            self.config.classify_timeout,
            self.config.retry_temperature,
        );
        let (assessment, exemplars) = tokio::join!(
            screen.screen(&cmd.message),
            self.exemplars.lookup(&cmd.message, EXEMPLAR_LIMIT),
        );

        let outcome = if assessment.crisis {
            debug!(
                conversation_id = %conversation.id(),
                source = ?assessment.source,
                "turn flagged as crisis"
            );
            self.crisis(&mut conversation, &cmd).await?
        } else {
            match conversation.state() {
                TurnState::AwaitingFollowup => self.followup(&mut conversation, &cmd).await?,
                TurnState::InCrisis => {
                    conversation.leave_crisis();
                    self.support(&mut conversation, &exemplars).await?
                }
                TurnState::Normal => self.opening(&mut conversation, &cmd, &exemplars).await?,
            }
        };

        self.conversations.save(&conversation).await?;

        Ok(ChatTurnResult {
            reply: outcome.reply,
            route: outcome.route,
            state: conversation.state(),
            stage: conversation.stage(),
            assistant_questions: outcome.questions,
            action_cards: outcome.cards,
            gate: outcome.gate,
        })
    }

    // ----- Routes -----

    /// Fresh turn: route to assessment or supportive listening. A
    /// concluded conversation no longer re-enters assessment.
    async fn opening(
        &self,
        conversation: &mut Conversation,
        cmd: &ChatTurnCommand,
        exemplars: &[Exemplar],
    ) -> Result<TurnOutcome, ChatTurnError> {
        if conversation.stage().is_terminal() {
            return self.support(conversation, exemplars).await;
        }

        let decision = classify_turn(&cmd.message, cmd.emotion.as_ref());
        debug!(
            conversation_id = %conversation.id(),
            route = ?decision.route,
            signals = ?decision.signals,
            "turn classified"
        );
        if !decision.is_assessment() {
            return self.support(conversation, exemplars).await;
        }

        conversation.note_main_issue(&cmd.message);
        let parse = parse_slots(&cmd.message, ParseContext::default());
        conversation.absorb_slots(parse.slots);
        if warrants_risk_question(&cmd.message, cmd.emotion.as_ref()) {
            conversation.mark_risk_warranted();
        }

        match intake_turn(
            &cmd.message,
            cmd.emotion.as_ref(),
            conversation.intake(),
            conversation.tracker(),
        ) {
            PolicyAction::Ask { kind, question } => self.pose(conversation, kind, question),
            PolicyAction::FallThroughToSupport => self.support(conversation, exemplars).await,
            PolicyAction::Conclude => self.conclusion(conversation, cmd).await,
        }
    }

    /// The user is answering the previous question: attribute the
    /// answer, fold parsed slots in, then ask the next gap or conclude.
    async fn followup(
        &self,
        conversation: &mut Conversation,
        cmd: &ChatTurnCommand,
    ) -> Result<TurnOutcome, ChatTurnError> {
        let pending = pending_context(conversation);
        let parse = parse_slots(&cmd.message, pending);
        conversation.absorb_answer(&cmd.message);
        conversation.absorb_slots(parse.slots);
        if warrants_risk_question(&cmd.message, cmd.emotion.as_ref()) {
            conversation.mark_risk_warranted();
        }

        match followup_turn(conversation.intake(), conversation.tracker()) {
            PolicyAction::Ask { kind, question } => self.pose(conversation, kind, question),
            PolicyAction::Conclude => self.conclusion(conversation, cmd).await,
            PolicyAction::FallThroughToSupport => {
                self.support(conversation, &[]).await
            }
        }
    }

    /// Poses the policy's single question. Question turns are fully
    /// deterministic; no completion is involved.
    fn pose(
        &self,
        conversation: &mut Conversation,
        kind: SlotQuestion,
        question: &'static str,
    ) -> Result<TurnOutcome, ChatTurnError> {
        conversation.note_question(kind, question);
        conversation.record_assistant_message(question)?;
        Ok(TurnOutcome {
            reply: question.to_string(),
            route: TurnRoute::Assessment,
            questions: vec![question.to_string()],
            cards: Vec::new(),
            gate: GateOutcome::clean(),
        })
    }

    async fn support(
        &self,
        conversation: &mut Conversation,
        exemplars: &[Exemplar],
    ) -> Result<TurnOutcome, ChatTurnError> {
        let reply = self.support_reply(conversation, exemplars).await;
        conversation.record_assistant_message(&reply)?;
        Ok(TurnOutcome::plain(reply, TurnRoute::Support))
    }

    async fn crisis(
        &self,
        conversation: &mut Conversation,
        cmd: &ChatTurnCommand,
    ) -> Result<TurnOutcome, ChatTurnError> {
        conversation.enter_crisis();
        let reply = self.crisis_reply(&cmd.message).await;
        conversation.record_assistant_message(&reply)?;
        Ok(TurnOutcome::plain(reply, TurnRoute::Crisis))
    }

    /// Conclusion: rank risk, pick skills, render, sanitize, gate, then
    /// wrap in a narrative. Memory consolidation runs best-effort before
    /// the per-assessment state is dropped.
    async fn conclusion(
        &self,
        conversation: &mut Conversation,
        cmd: &ChatTurnCommand,
    ) -> Result<TurnOutcome, ChatTurnError> {
        let intake = conversation.intake().clone();
        let tier = infer_tier(
            intake.risk_level,
            conversation.tracker().risk_warranted,
            intake.impact_score,
            intake.duration,
        );
        let emotion = cmd.emotion.as_ref().map(|e| e.canonical_label().to_string());

        let selections = select_skills(self.registry, tier, emotion.as_deref(), &intake);
        let mut plan = render_skills(self.registry, &selections, &intake);
        let fixed = sanitize_cards(&mut plan.action_cards, self.fix_table);
        let report = validate_reply(&plan.action_cards, &plan.next_steps_lines);
        if !report.pass {
            warn!(
                conversation_id = %conversation.id(),
                missing = ?report.messages(),
                "conclusion output failed the contract gate"
            );
            if self.config.enforce_gate {
                return Err(ChatTurnError::ContractViolation(report.messages()));
            }
        }
        if !fixed.is_empty() {
            debug!(
                conversation_id = %conversation.id(),
                fixes = ?fixed,
                "sanitizer repaired conclusion steps"
            );
        }

        let narrative = self.conclusion_narrative(&intake, tier, &selections).await;
        let reply = prompts::compose_conclusion_reply(&narrative, &plan.next_steps_lines);
        conversation.record_assistant_message(&reply)?;

        let memory = MemoryUpdateHandler::new(
            self.llm.clone(),
            self.memories.clone(),
            self.config.retry_temperature,
        );
        let update = MemoryUpdateCommand {
            conversation_id: conversation.id(),
            transcript: transcript_of(conversation),
        };
        if let Err(error) = memory.handle(update).await {
            warn!(%error, "memory update failed after conclusion");
        }

        conversation.conclude();

        Ok(TurnOutcome {
            reply,
            route: TurnRoute::Assessment,
            questions: Vec::new(),
            cards: plan.action_cards,
            gate: GateOutcome {
                pass: report.pass,
                fixed,
                missing: report.messages(),
            },
        })
    }

    // ----- Completions with fallbacks -----

    async fn support_reply(&self, conversation: &Conversation, exemplars: &[Exemplar]) -> String {
        let mut request = ChatRequest::new()
            .with_system(prompts::support_system_prompt(exemplars))
            .with_temperature(0.7)
            .with_max_tokens(300);
        for message in history_tail(conversation) {
            request = request.with_message(wire_role(message.role()), message.content());
        }

        match self.llm.complete(request).await {
            Ok(completion) if !completion.content.trim().is_empty() => {
                completion.content.trim().to_string()
            }
            Ok(_) => prompts::FALLBACK_SUPPORT_REPLY.to_string(),
            Err(error) => {
                warn!(%error, "support reply generation failed, using fallback");
                prompts::FALLBACK_SUPPORT_REPLY.to_string()
            }
        }
    }

    /// Crisis replies are generated, then gated; anything short of a
    /// pass is replaced by the hand-written template.
    async fn crisis_reply(&self, utterance: &str) -> String {
        let request = ChatRequest::new()
            .with_system(prompts::CRISIS_SYSTEM_PROMPT)
            .with_user(utterance)
            .with_temperature(0.3)
            .with_max_tokens(400);

        let candidate = match self.llm.complete(request).await {
            Ok(completion) => completion.content.trim().to_string(),
            Err(error) => {
                warn!(%error, "crisis reply generation failed, using template");
                return prompts::CRISIS_FALLBACK_REPLY.to_string();
            }
        };

        let report = gate_crisis_reply(&candidate);
        if report.pass {
            candidate
        } else {
            warn!(
                missing = ?report.messages(),
                "generated crisis reply failed the safety gate, using template"
            );
            prompts::CRISIS_FALLBACK_REPLY.to_string()
        }
    }

    async fn conclusion_narrative(
        &self,
        intake: &IntakeInfo,
        tier: RiskTier,
        selections: &[SkillSelection],
    ) -> String {
        let names: Vec<&str> = selections
            .iter()
            .filter_map(|s| self.registry.get(&s.skill_id))
            .map(|skill| skill.name.as_str())
            .collect();
        let request = ChatRequest::new()
            .with_system(prompts::CONCLUSION_SYSTEM_PROMPT)
            .with_user(prompts::conclusion_user_prompt(intake, tier, &names))
            .with_temperature(0.6)
            .with_max_tokens(300);

        match self.llm.complete(request).await {
            Ok(completion) if !completion.content.trim().is_empty() => {
                completion.content.trim().to_string()
            }
            Ok(_) => prompts::FALLBACK_CONCLUSION_INTRO.to_string(),
            Err(error) => {
                warn!(%error, "conclusion narrative generation failed, using fallback");
                prompts::FALLBACK_CONCLUSION_INTRO.to_string()
            }
        }
    }
}

/// Parse context for a follow-up answer: the slot the previous question
/// asked about is marked pending so short answers bind to it.
fn pending_context(conversation: &Conversation) -> ParseContext {
    let last = conversation.tracker().last_asked;
    ParseContext {
        impact_pending: matches!(last, Some(SlotQuestion::ImpactScale)),
        duration_pending: matches!(
            last,
            Some(SlotQuestion::DurationOptions) | Some(SlotQuestion::DurationProbe)
        ),
        risk_pending: matches!(last, Some(SlotQuestion::RiskOptions)),
    }
}

fn history_tail(conversation: &Conversation) -> impl Iterator<Item = &Message> {
    let messages = conversation.messages();
    let skip = messages.len().saturating_sub(HISTORY_TAIL);
    messages.iter().skip(skip).filter(|m| m.role().is_user_visible())
}

fn wire_role(role: Role) -> MessageRole {
    match role {
        Role::System => MessageRole::System,
        Role::User => MessageRole::User,
        Role::Assistant => MessageRole::Assistant,
    }
}

/// Transcript handed to memory extraction: the visible dialogue, one
/// labelled line per message.
fn transcript_of(conversation: &Conversation) -> String {
    conversation
        .messages()
        .iter()
        .filter(|m| m.role().is_user_visible())
        .map(|m| {
            let speaker = match m.role() {
                Role::User => "用户",
                _ => "助手",
            };
            format!("{}：{}", speaker, m.content())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
