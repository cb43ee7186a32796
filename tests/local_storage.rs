// Tests for config and workspace persistence through an explicit context.
use chrono::NaiveDate;
use scholar::config::{Config, GEMINI_BASE_URL, Settings};
use scholar::context::{AppContext, TestContext};
use scholar::model::{EventColor, EventFields, TaskFields};
use scholar::storage::Workspace;
use scholar::store::{EventActions, TaskActions};
use std::fs;

#[test]
fn test_missing_config_yields_defaults() {
    let ctx = TestContext::new();
    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));

    let config = Config::load_or_default(&ctx).unwrap();
    assert_eq!(config.selected_model, "gemini-1.5-flash");
    assert_eq!(config.default_course, "General");
    assert_eq!(config.endpoints.gemini, GEMINI_BASE_URL);
    assert_eq!(config.api_key_for("google"), None);
}

#[test]
fn test_config_roundtrip() {
    let ctx = TestContext::new();
    let mut config = Config::default();
    config.set_model("gpt-4o").unwrap();
    config.api_key = Some("shared".to_string());
    config
        .api_keys
        .insert("groq".to_string(), "gsk-1".to_string());
    config.save(&ctx).unwrap();

    let loaded = Config::load(&ctx).unwrap();
    assert_eq!(loaded.selected_model(), "gpt-4o");
    assert_eq!(loaded.api_key_for("groq"), Some("gsk-1"));
    assert_eq!(loaded.api_key_for("openai"), Some("shared"));
    assert!(!ctx.get_config_dir().unwrap().join("config.tmp").exists());
}

#[test]
fn test_unknown_model_is_rejected() {
    let mut config = Config::default();
    assert!(config.set_model("gpt-5-ultra").is_err());
    assert_eq!(config.selected_model, "gemini-1.5-flash");
}

#[test]
fn test_partial_config_fills_defaults() {
    let ctx = TestContext::new();
    fs::write(
        ctx.get_config_file_path().unwrap(),
        "selected_model = \"gemma2-9b-it\"\n\n[endpoints]\ngroq = \"http://localhost:9000\"\n",
    )
    .unwrap();

    let config = Config::load(&ctx).unwrap();
    assert_eq!(config.selected_model, "gemma2-9b-it");
    assert_eq!(config.endpoints.groq, "http://localhost:9000");
    assert_eq!(config.endpoints.gemini, GEMINI_BASE_URL);
    assert!((config.temperature - 0.7).abs() < f32::EPSILON);
}

#[test]
fn test_corrupt_config_is_not_treated_as_missing() {
    let ctx = TestContext::new();
    fs::write(ctx.get_config_file_path().unwrap(), "selected_model = [").unwrap();
    let err = Config::load_or_default(&ctx).unwrap_err();
    assert!(!Config::is_missing_config_error(&err));
}

#[test]
fn test_workspace_roundtrip() {
    let ctx = TestContext::new();
    let mut ws = Workspace::load(&ctx).unwrap();
    assert!(ws.tasks.is_empty());

    let due = NaiveDate::from_ymd_opt(2025, 1, 17).unwrap();
    let task = ws.tasks.add_task(TaskFields::new("Essay", due));
    ws.tasks.toggle_starred(&task.id);
    ws.events.create_event(EventFields {
        title: "Seminar".to_string(),
        date: due,
        time: Some("02:00 PM".to_string()),
        color: EventColor::Purple,
    });
    ws.save(&ctx).unwrap();

    let loaded = Workspace::load(&ctx).unwrap();
    assert_eq!(loaded.tasks.tasks, ws.tasks.tasks);
    assert_eq!(loaded.events.events, ws.events.events);
    assert!(loaded.tasks.get(&task.id).unwrap().starred);
    assert!(ctx.get_workspace_path().unwrap().exists());
}

#[test]
fn test_corrupt_workspace_is_an_error() {
    let ctx = TestContext::new();
    fs::write(ctx.get_workspace_path().unwrap(), "{ not json").unwrap();
    assert!(Workspace::load(&ctx).is_err());
    // The broken file is left for the user to inspect.
    assert_eq!(
        fs::read_to_string(ctx.get_workspace_path().unwrap()).unwrap(),
        "{ not json"
    );
}
