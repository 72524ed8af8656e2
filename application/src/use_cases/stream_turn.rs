//! Stream Turn use case.
//!
//! Drives one chat turn: validates the request, builds the prompt from the
//! conversation history, streams the main answer as [`ChatEvent::TextChunk`]
//! events, asks for follow-up suggestions through a structured completion,
//! emits exactly one terminal event and finally commits the turn to memory.
//!
//! The turn runs in its own task and talks to the transport through a
//! bounded channel, so fragments are forwarded one at a time with
//! back-pressure. If the transport drops its [`TurnEvents`], the turn is
//! abandoned and nothing is committed.

use crate::config::BehaviorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::conversation_memory::ConversationMemory;
use crate::ports::llm_gateway::{GatewayError, LlmGateway, StreamHandle};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::{OwnedMutexGuard, mpsc};
use tracing::{debug, error, info, warn};
use tutor_relay_domain::util::preview;
use tutor_relay_domain::{
    ChatEvent, ChatTurnRequest, DomainError, FollowUpFilter, Message, PromptTemplates,
    StreamEvent, augment_message,
};

/// Apology sent to the client when the main answer cannot be produced.
pub const APOLOGY_MESSAGE: &str =
    "I apologize, but I encountered an internal server error. Please try again later.";

/// Why a turn stage did not produce its result.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Prompt error: {0}")]
    Prompt(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Model call timed out")]
    Timeout,

    #[error("Client disconnected")]
    Disconnected,
}

/// Receiving side of a turn.
///
/// Yields zero or more [`ChatEvent::TextChunk`] events followed by exactly
/// one terminal event, then `None`.
pub struct TurnEvents {
    receiver: mpsc::Receiver<ChatEvent>,
}

impl TurnEvents {
    fn new(receiver: mpsc::Receiver<ChatEvent>) -> Self {
        Self { receiver }
    }

    pub async fn next(&mut self) -> Option<ChatEvent> {
        self.receiver.recv().await
    }

    /// Drain every remaining event.
    pub async fn collect(mut self) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.receiver.recv().await {
            events.push(event);
        }
        events
    }

    pub fn into_inner(self) -> mpsc::Receiver<ChatEvent> {
        self.receiver
    }
}

/// Per-conversation locks serializing turns that share a conversation id.
#[derive(Default)]
struct TurnLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TurnLocks {
    async fn acquire(&self, conversation_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(conversation_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry unless a turn currently holds or awaits it.
    fn forget(&self, conversation_id: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(conversation_id)
            && Arc::strong_count(lock) == 1
        {
            locks.remove(conversation_id);
        }
    }
}

/// Use case for streaming one chat turn.
#[derive(Clone)]
pub struct StreamTurnUseCase {
    gateway: Arc<dyn LlmGateway>,
    memory: Arc<dyn ConversationMemory>,
    templates: Arc<PromptTemplates>,
    behavior: BehaviorConfig,
    follow_up_filter: FollowUpFilter,
    conversation_logger: Arc<dyn ConversationLogger>,
    turn_locks: Arc<TurnLocks>,
}

impl StreamTurnUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        memory: Arc<dyn ConversationMemory>,
        templates: PromptTemplates,
    ) -> Self {
        Self {
            gateway,
            memory,
            templates: Arc::new(templates),
            behavior: BehaviorConfig::default(),
            follow_up_filter: FollowUpFilter::default(),
            conversation_logger: Arc::new(NoConversationLogger),
            turn_locks: Arc::new(TurnLocks::default()),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_follow_up_filter(mut self, filter: FollowUpFilter) -> Self {
        self.follow_up_filter = filter;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Start a turn and return its event stream.
    ///
    /// Must be called from within a Tokio runtime. Validation happens before
    /// any model call; an invalid request yields a single terminal
    /// [`ChatEvent::Failed`] describing the problem.
    pub fn stream_turn(&self, request: ChatTurnRequest) -> TurnEvents {
        let (tx, rx) = mpsc::channel(self.behavior.channel_capacity.max(1));

        if let Err(e) = request.validate() {
            warn!(
                conversation_id = %request.conversation_id,
                "Rejected chat turn: {}", e
            );
            let message = format!(
                "Input error: {}. Please ensure required fields like 'conversationId', \
                 'userId' and 'tutorName' are provided.",
                e
            );
            // Fresh channel with capacity >= 1, so this cannot be full.
            let _ = tx.try_send(ChatEvent::Failed(message));
            return TurnEvents::new(rx);
        }

        let this = self.clone();
        tokio::spawn(async move { this.run_turn(request, tx).await });

        TurnEvents::new(rx)
    }

    /// Read a conversation's stored history.
    pub fn read(&self, conversation_id: &str) -> Option<Vec<Message>> {
        self.memory.read(conversation_id)
    }

    /// Remove a conversation's history. Unknown ids are ignored.
    pub fn clear(&self, conversation_id: &str) {
        self.memory.clear(conversation_id);
        self.turn_locks.forget(conversation_id);
        info!(conversation_id, "Cleared conversation memory");
    }

    /// Hold the conversation's turn lock around the turn, then release the
    /// lock entry once no other turn is waiting on it.
    async fn run_turn(self, request: ChatTurnRequest, tx: mpsc::Sender<ChatEvent>) {
        let turn_guard = self.turn_locks.acquire(&request.conversation_id).await;
        self.run_locked_turn(&request, &tx).await;
        drop(turn_guard);
        self.turn_locks.forget(&request.conversation_id);
    }

    async fn run_locked_turn(&self, request: &ChatTurnRequest, tx: &mpsc::Sender<ChatEvent>) {
        let conversation_id = request.conversation_id.as_str();

        info!(
            conversation_id,
            user_id = %request.context.user_id,
            tutor = %request.context.tutor_name,
            "Starting chat turn: {}",
            preview(&request.message, 100)
        );
        self.conversation_logger.log(ConversationEvent::new(
            "turn_started",
            serde_json::json!({
                "conversation_id": conversation_id,
                "user_id": request.context.user_id,
                "tutor_name": request.context.tutor_name,
                "message": request.message,
            }),
        ));

        let answer = match self.main_stage(request, tx).await {
            Ok(answer) => answer,
            Err(TurnError::Disconnected) => {
                info!(conversation_id, "Client disconnected during answer; turn not committed");
                return;
            }
            Err(e) => {
                error!(conversation_id, error = %e, "Main completion failed");
                self.conversation_logger.log(ConversationEvent::new(
                    "turn_failed",
                    serde_json::json!({
                        "conversation_id": conversation_id,
                        "error": e.to_string(),
                    }),
                ));
                let _ = tx.send(ChatEvent::Failed(self.user_safe_message(&e))).await;
                return;
            }
        };

        let follow_ups = match self.follow_up_stage(request, &answer, tx).await {
            Ok(questions) => Some(questions),
            Err(TurnError::Disconnected) => {
                info!(conversation_id, "Client disconnected before follow-ups; turn not committed");
                return;
            }
            Err(e) => {
                warn!(conversation_id, error = %e, "Follow-up generation failed");
                self.conversation_logger.log(ConversationEvent::new(
                    "follow_ups_failed",
                    serde_json::json!({
                        "conversation_id": conversation_id,
                        "error": e.to_string(),
                    }),
                ));
                None
            }
        };

        let follow_up_count = follow_ups.as_ref().map(Vec::len);
        if tx.send(ChatEvent::FollowUps(follow_ups)).await.is_err() {
            info!(conversation_id, "Client disconnected before terminal event; turn not committed");
            return;
        }

        self.memory.append(
            conversation_id,
            Message::human(request.message.as_str()),
            Message::ai(answer.as_str()),
        );

        info!(
            conversation_id,
            bytes = answer.len(),
            follow_ups = ?follow_up_count,
            "Chat turn completed"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "turn_completed",
            serde_json::json!({
                "conversation_id": conversation_id,
                "bytes": answer.len(),
                "text": answer,
                "follow_ups": follow_up_count,
            }),
        ));
    }

    /// Build the prompt, stream the answer to the client and return the
    /// accumulated text.
    async fn main_stage(
        &self,
        request: &ChatTurnRequest,
        tx: &mpsc::Sender<ChatEvent>,
    ) -> Result<String, TurnError> {
        let messages = self.build_prompt(request)?;
        debug!(
            conversation_id = %request.conversation_id,
            messages = messages.len(),
            "Opening streamed completion"
        );

        let mut handle: StreamHandle = self
            .until_disconnect(tx, self.gateway.stream_complete(&messages))
            .await??;

        let mut buffer = String::new();
        loop {
            let event = self.until_disconnect(tx, handle.next()).await?;
            match event {
                Some(StreamEvent::Delta(fragment)) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    buffer.push_str(&fragment);
                    tx.send(ChatEvent::TextChunk(fragment))
                        .await
                        .map_err(|_| TurnError::Disconnected)?;
                }
                Some(StreamEvent::Completed(text)) => {
                    // Non-streaming providers deliver the whole answer here.
                    if buffer.is_empty() && !text.is_empty() {
                        buffer.push_str(&text);
                        tx.send(ChatEvent::TextChunk(text))
                            .await
                            .map_err(|_| TurnError::Disconnected)?;
                    }
                    break;
                }
                Some(StreamEvent::Error(e)) => {
                    return Err(GatewayError::RequestFailed(e).into());
                }
                None => {
                    return Err(GatewayError::RequestFailed(
                        "stream closed before completion".to_string(),
                    )
                    .into());
                }
            }
        }

        debug!(
            conversation_id = %request.conversation_id,
            bytes = buffer.len(),
            "Streamed completion finished"
        );
        Ok(buffer)
    }

    /// Ask for follow-up suggestions for the delivered answer.
    async fn follow_up_stage(
        &self,
        request: &ChatTurnRequest,
        answer: &str,
        tx: &mpsc::Sender<ChatEvent>,
    ) -> Result<Vec<String>, TurnError> {
        if answer.is_empty() {
            debug!(
                conversation_id = %request.conversation_id,
                "Empty answer; skipping follow-up generation"
            );
            return Ok(Vec::new());
        }

        let prompt = self.templates.follow_up_prompt(
            &request.context.tutor_name,
            &request.message,
            answer,
        )?;

        let output = self
            .until_disconnect(tx, self.gateway.structured_complete(&prompt))
            .await??;

        let filtered = self.follow_up_filter.apply(output.follow_up_questions);
        if filtered.discarded {
            warn!(
                conversation_id = %request.conversation_id,
                "Discarded follow-up list containing blank entries"
            );
        }
        for question in &filtered.overlong {
            warn!(
                conversation_id = %request.conversation_id,
                "Follow-up exceeds {} words: {}",
                self.follow_up_filter.max_words,
                question
            );
        }

        Ok(filtered.questions)
    }

    /// System prompt, stored history, then the (possibly augmented) message.
    fn build_prompt(&self, request: &ChatTurnRequest) -> Result<Vec<Message>, DomainError> {
        let system = self.templates.system_prompt(&request.context.tutor_name)?;
        let history = self.memory.get_or_create(&request.conversation_id);

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system));
        messages.extend(history);
        messages.push(Message::human(augment_message(
            &request.message,
            &request.context.user_id,
        )));
        Ok(messages)
    }

    /// Await `fut` under the configured timeout, giving up early if the
    /// client goes away.
    async fn until_disconnect<F, T>(
        &self,
        tx: &mpsc::Sender<ChatEvent>,
        fut: F,
    ) -> Result<T, TurnError>
    where
        F: Future<Output = T>,
    {
        let bounded = async {
            match self.behavior.timeout {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .map_err(|_| TurnError::Timeout),
                None => Ok(fut.await),
            }
        };

        tokio::select! {
            biased;
            _ = tx.closed() => Err(TurnError::Disconnected),
            result = bounded => result,
        }
    }

    fn user_safe_message(&self, error: &TurnError) -> String {
        if self.behavior.expose_error_details {
            format!("{} (details: {})", APOLOGY_MESSAGE, error)
        } else {
            APOLOGY_MESSAGE.to_string()
        }
    }
}
