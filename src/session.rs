// File: ./src/session.rs
/*! Chat transcript and the one-call-per-submission assistant facade.

Every submission takes a [`TurnTicket`]. Only the reply carrying the newest
ticket may land in the transcript; replies for superseded or cancelled turns
are dropped, so answers never appear out of submission order.
*/
use crate::client::{CallState, ChatTransport, DispatchError, Dispatcher};
use crate::config::{Config, Settings};
use crate::controller::{self, Applied};
use crate::intent::{Mode, ParseContext, Routed, route};
use crate::store::{EventActions, TaskActions};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTicket {
    generation: u64,
}

impl TurnTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    generation: u64,
    pending: Option<u64>,
    call_state: CallState,
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            generation: 0,
            pending: None,
            call_state: CallState::Idle,
        }
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Records the user's message and supersedes any turn still in flight.
    pub fn begin_turn(&mut self, prompt: &str) -> TurnTicket {
        self.generation += 1;
        if self.pending.is_some() {
            log::debug!("Turn {} supersedes an in-flight turn", self.generation);
        }
        self.pending = Some(self.generation);
        self.call_state = CallState::Sending;
        self.messages.push(ChatMessage {
            role: Role::User,
            content: prompt.to_string(),
        });
        TurnTicket {
            generation: self.generation,
        }
    }

    /// Appends the reply if `ticket` is still current. Returns whether it was kept.
    pub fn finish_turn(&mut self, ticket: TurnTicket, reply: String) -> bool {
        if self.pending != Some(ticket.generation) {
            log::warn!(
                "Dropping stale reply for turn {} (current turn {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.pending = None;
        self.call_state = CallState::Success(reply.clone());
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: reply,
        });
        true
    }

    /// Like [`Self::finish_turn`] for a model call; errors land as their message.
    pub fn finish_call(
        &mut self,
        ticket: TurnTicket,
        result: &Result<String, DispatchError>,
    ) -> bool {
        let text = match result {
            Ok(text) => text.clone(),
            Err(e) => e.to_string(),
        };
        if !self.finish_turn(ticket, text) {
            return false;
        }
        self.call_state = CallState::from(result);
        true
    }

    /// Abandons the in-flight turn; its reply will be dropped.
    pub fn cancel(&mut self) {
        if let Some(generation) = self.pending.take() {
            log::debug!("Cancelled turn {}", generation);
            self.call_state = CallState::Idle;
        }
    }

    /// State of the most recent turn.
    pub fn call_state(&self) -> &CallState {
        &self.call_state
    }

    /// Whether the "thinking" placeholder should be shown.
    pub fn is_thinking(&self) -> bool {
        self.call_state.is_sending()
    }

    pub fn pending(&self) -> Option<TurnTicket> {
        self.pending.map(|generation| TurnTicket { generation })
    }

    pub fn clear(&mut self) {
        self.cancel();
        self.call_state = CallState::Idle;
        self.messages.clear();
    }
}

/// What a submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Command(Applied),
    Answer(String),
}

impl Outcome {
    pub fn text(&self) -> &str {
        match self {
            Outcome::Command(applied) => &applied.message,
            Outcome::Answer(text) => text,
        }
    }
}

/// A question whose model call has not been made yet.
///
/// It owns what the call needs, so a host may hold several at once and run
/// them concurrently while the [`Assistant`] keeps accepting submissions.
pub struct PendingAsk<T: ChatTransport> {
    ticket: TurnTicket,
    prompt: String,
    dispatcher: Arc<Dispatcher<T>>,
}

impl<T: ChatTransport> PendingAsk<T> {
    pub fn ticket(&self) -> TurnTicket {
        self.ticket
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub async fn run(self, settings: &dyn Settings) -> AnsweredAsk {
        let result = self.dispatcher.dispatch_with(settings, &self.prompt).await;
        AnsweredAsk {
            ticket: self.ticket,
            result,
        }
    }
}

/// A finished model call waiting to be recorded with [`Assistant::finish`].
#[derive(Debug, Clone)]
pub struct AnsweredAsk {
    ticket: TurnTicket,
    result: Result<String, DispatchError>,
}

impl AnsweredAsk {
    pub fn ticket(&self) -> TurnTicket {
        self.ticket
    }

    pub fn result(&self) -> &Result<String, DispatchError> {
        &self.result
    }
}

pub enum Turn<T: ChatTransport> {
    /// Commands are applied synchronously and already recorded.
    Done(Outcome),
    Ask(PendingAsk<T>),
}

/// Routes submissions and keeps the transcript.
///
/// [`Assistant::submit`] runs a whole turn and borrows the assistant across
/// the model call. Hosts that let the user resubmit before an answer arrives
/// use [`Assistant::begin`], [`PendingAsk::run`] and [`Assistant::finish`]
/// instead; late answers to superseded turns are then dropped.
pub struct Assistant<T: ChatTransport> {
    dispatcher: Arc<Dispatcher<T>>,
    conversation: Conversation,
}

impl<T: ChatTransport> Assistant<T> {
    pub fn new(dispatcher: Dispatcher<T>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            conversation: Conversation::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Records the utterance and either applies it as a command or hands back
    /// the model call to make.
    pub fn begin(
        &mut self,
        input: &str,
        mode: Option<Mode>,
        today: NaiveDate,
        default_course: &str,
        tasks: &mut dyn TaskActions,
        events: &mut dyn EventActions,
    ) -> Turn<T> {
        let ticket = self.conversation.begin_turn(input);
        let snapshot = tasks.snapshot();
        let ctx = ParseContext::new(today, &snapshot).with_default_course(default_course);

        match route(input, mode, &ctx) {
            Routed::Command(command) => {
                let applied = controller::apply_command(command, tasks, events);
                self.conversation
                    .finish_turn(ticket, applied.message.clone());
                Turn::Done(Outcome::Command(applied))
            }
            Routed::Ask(prompt) => Turn::Ask(PendingAsk {
                ticket,
                prompt,
                dispatcher: Arc::clone(&self.dispatcher),
            }),
        }
    }

    /// Records a model answer. Returns `None` when its turn was superseded.
    pub fn finish(&mut self, answer: AnsweredAsk) -> Option<Outcome> {
        if let Err(e) = &answer.result
            && !matches!(e, DispatchError::MissingApiKey)
        {
            log::warn!("Model call failed: {}", e);
        }
        if !self.conversation.finish_call(answer.ticket, &answer.result) {
            return None;
        }
        Some(Outcome::Answer(match answer.result {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }))
    }

    /// Routes one utterance: commands are applied to the stores, questions go
    /// to the selected model. Either way the reply lands in the transcript.
    pub async fn submit(
        &mut self,
        input: &str,
        mode: Option<Mode>,
        today: NaiveDate,
        config: &Config,
        tasks: &mut dyn TaskActions,
        events: &mut dyn EventActions,
    ) -> Outcome {
        match self.begin(input, mode, today, &config.default_course, tasks, events) {
            Turn::Done(outcome) => outcome,
            Turn::Ask(pending) => {
                let answer = pending.run(config).await;
                let text = match answer.result() {
                    Ok(text) => text.clone(),
                    Err(e) => e.to_string(),
                };
                self.finish(answer).unwrap_or(Outcome::Answer(text))
            }
        }
    }
}
