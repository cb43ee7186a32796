// Tests for transcript turn ordering and the assistant facade.
use chrono::NaiveDate;
use futures::future::BoxFuture;
use scholar::client::{
    CallState, ChatTransport, DispatchError, Dispatcher, InboundResponse, MISSING_KEY_MESSAGE,
    OutboundRequest,
};
use scholar::config::{Config, Endpoints};
use scholar::intent::Mode;
use scholar::session::{Assistant, Conversation, Outcome, PendingAsk, Role, Turn};
use scholar::store::{EventStore, TaskStore};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct EchoTransport {
    calls: AtomicUsize,
}

impl ChatTransport for EchoTransport {
    fn post_json<'a>(
        &'a self,
        request: OutboundRequest,
    ) -> BoxFuture<'a, Result<InboundResponse, String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = serde_json::from_str::<serde_json::Value>(&request.body)
            .ok()
            .and_then(|v| v["messages"][0]["content"].as_str().map(str::to_string))
            .unwrap_or_default();
        Box::pin(async move {
            Ok(InboundResponse {
                status: 200,
                body: serde_json::json!({
                    "choices": [{"message": {"content": format!("echo: {}", prompt)}}]
                })
                .to_string(),
            })
        })
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn openai_config() -> Config {
    let mut config = Config {
        selected_model: "gpt-4o-mini".to_string(),
        ..Config::default()
    };
    config.api_keys.insert("openai".to_string(), "sk".to_string());
    config
}

fn ask(assistant: &mut Assistant<EchoTransport>, input: &str) -> PendingAsk<EchoTransport> {
    let mut tasks = TaskStore::new();
    let mut events = EventStore::new();
    match assistant.begin(input, None, today(), "General", &mut tasks, &mut events) {
        Turn::Ask(pending) => pending,
        Turn::Done(outcome) => panic!("expected a question, got {:?}", outcome),
    }
}

#[test]
fn test_stale_reply_is_dropped() {
    let mut convo = Conversation::new();
    let first = convo.begin_turn("what is 2+2?");
    let second = convo.begin_turn("actually, what is 3+3?");
    assert!(convo.is_thinking());

    // The first answer arrives late and must not land.
    assert!(!convo.finish_turn(first, "4".to_string()));
    assert!(convo.is_thinking());
    assert!(convo.finish_turn(second, "6".to_string()));
    assert!(!convo.is_thinking());

    let contents: Vec<(Role, &str)> = convo
        .messages()
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        contents,
        vec![
            (Role::User, "what is 2+2?"),
            (Role::User, "actually, what is 3+3?"),
            (Role::Assistant, "6"),
        ]
    );
}

#[test]
fn test_cancelled_turn_drops_its_reply() {
    let mut convo = Conversation::new();
    let ticket = convo.begin_turn("summarize chapter 3");
    assert_eq!(convo.pending(), Some(ticket));
    convo.cancel();
    assert!(!convo.is_thinking());
    assert!(!convo.finish_turn(ticket, "late".to_string()));
    assert_eq!(convo.messages().len(), 1);
}

#[test]
fn test_generations_increase() {
    let mut convo = Conversation::new();
    let a = convo.begin_turn("a");
    let b = convo.begin_turn("b");
    assert!(b.generation() > a.generation());
    convo.clear();
    assert!(convo.messages().is_empty());
    assert!(!convo.finish_turn(b, "x".to_string()));
}

#[tokio::test]
async fn test_assistant_applies_commands_and_answers_questions() {
    let dispatcher = Dispatcher::new(EchoTransport::default(), Endpoints::default(), 0.7);
    let mut assistant = Assistant::new(dispatcher);
    let mut config = Config {
        selected_model: "gpt-4o-mini".to_string(),
        ..Config::default()
    };
    config.api_keys.insert("openai".to_string(), "sk".to_string());
    let mut tasks = TaskStore::new();
    let mut events = EventStore::new();

    let created = assistant
        .submit(
            "create task essay due friday",
            None,
            today(),
            &config,
            &mut tasks,
            &mut events,
        )
        .await;
    assert!(matches!(created, Outcome::Command(ref a) if a.changed));
    assert_eq!(tasks.len(), 1);

    let starred = assistant
        .submit(
            "star essay",
            Some(Mode::Create),
            today(),
            &config,
            &mut tasks,
            &mut events,
        )
        .await;
    assert_eq!(starred.text(), "Starred \"Essay\".");
    assert!(tasks.tasks[0].starred);

    let answer = assistant
        .submit(
            "why is the sky blue?",
            None,
            today(),
            &config,
            &mut tasks,
            &mut events,
        )
        .await;
    assert_eq!(answer, Outcome::Answer("echo: why is the sky blue?".to_string()));
    assert_eq!(assistant.dispatcher().transport().calls.load(Ordering::SeqCst), 1);

    let messages = assistant.conversation().messages();
    assert_eq!(messages.len(), 6);
    assert_eq!(messages[5].content, "echo: why is the sky blue?");
    assert!(!assistant.conversation().is_thinking());
}

#[tokio::test]
async fn test_assistant_without_key_explains_instead_of_calling() {
    let dispatcher = Dispatcher::new(EchoTransport::default(), Endpoints::default(), 0.7);
    let mut assistant = Assistant::new(dispatcher);
    let config = Config::default();
    let mut tasks = TaskStore::new();
    let mut events = EventStore::new();

    let outcome = assistant
        .submit(
            "explain recursion",
            None,
            today(),
            &config,
            &mut tasks,
            &mut events,
        )
        .await;

    assert_eq!(outcome.text(), MISSING_KEY_MESSAGE);
    assert_eq!(assistant.dispatcher().transport().calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_call_state_follows_the_turn() {
    let mut convo = Conversation::new();
    assert_eq!(convo.call_state(), &CallState::Idle);

    let ticket = convo.begin_turn("hello");
    assert_eq!(convo.call_state(), &CallState::Sending);
    assert!(convo.finish_call(ticket, &Ok("hi there".to_string())));
    assert_eq!(convo.call_state(), &CallState::Success("hi there".to_string()));

    let ticket = convo.begin_turn("hello again");
    assert!(convo.finish_call(ticket, &Err(DispatchError::MissingApiKey)));
    assert_eq!(
        convo.call_state(),
        &CallState::Failed(MISSING_KEY_MESSAGE.to_string())
    );
    assert_eq!(convo.messages()[3].content, MISSING_KEY_MESSAGE);

    convo.begin_turn("one more");
    convo.cancel();
    assert_eq!(convo.call_state(), &CallState::Idle);
}

#[test]
fn test_stale_call_leaves_newer_turn_sending() {
    let mut convo = Conversation::new();
    let first = convo.begin_turn("a");
    let second = convo.begin_turn("b");
    assert!(!convo.finish_call(first, &Ok("late".to_string())));
    assert_eq!(convo.call_state(), &CallState::Sending);
    assert!(convo.finish_call(second, &Ok("fresh".to_string())));
    assert_eq!(convo.call_state(), &CallState::Success("fresh".to_string()));
}

#[tokio::test]
async fn test_overlapping_questions_keep_only_the_newest_answer() {
    let dispatcher = Dispatcher::new(EchoTransport::default(), Endpoints::default(), 0.7);
    let mut assistant = Assistant::new(dispatcher);
    let config = openai_config();

    let first = ask(&mut assistant, "what is 2+2?");
    let second = ask(&mut assistant, "what is 3+3?");
    assert!(second.ticket().generation() > first.ticket().generation());
    assert!(assistant.conversation().is_thinking());

    let (old, new) = futures::join!(first.run(&config), second.run(&config));
    assert_eq!(old.result(), &Ok("echo: what is 2+2?".to_string()));

    // The older answer arrives last and is dropped.
    assert_eq!(
        assistant.finish(new),
        Some(Outcome::Answer("echo: what is 3+3?".to_string()))
    );
    assert_eq!(assistant.finish(old), None);
    assert_eq!(assistant.dispatcher().transport().calls.load(Ordering::SeqCst), 2);

    let contents: Vec<&str> = assistant
        .conversation()
        .messages()
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, vec!["what is 2+2?", "what is 3+3?", "echo: what is 3+3?"]);
    assert!(!assistant.conversation().is_thinking());
}

#[tokio::test]
async fn test_cancelled_question_is_not_recorded() {
    let dispatcher = Dispatcher::new(EchoTransport::default(), Endpoints::default(), 0.7);
    let mut assistant = Assistant::new(dispatcher);
    let config = openai_config();

    let pending = ask(&mut assistant, "summarize chapter 3");
    assert_eq!(pending.prompt(), "summarize chapter 3");
    assistant.conversation_mut().cancel();

    let answer = pending.run(&config).await;
    assert_eq!(assistant.finish(answer), None);
    assert_eq!(assistant.conversation().messages().len(), 1);
    assert_eq!(assistant.conversation().call_state(), &CallState::Idle);
}
