// Tests for the classifier table order, mode selection and the end-to-end
// parsing scenarios.
use chrono::{Duration, NaiveDate};
use scholar::intent::{CLASSIFIERS, IntentKind, Mode, ParseContext, Routed, parse_command, route};
use scholar::model::matcher::resolve_task_id;
use scholar::model::{EventColor, ParsedCommand, Priority, TaskRef};
use scholar::store::{TaskActions, TaskStore};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn math_homework() -> Vec<TaskRef> {
    vec![TaskRef::new("3f2a-math", "Math homework")]
}

#[test]
fn test_classifier_table_order() {
    let kinds: Vec<IntentKind> = CLASSIFIERS.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IntentKind::CreateTask,
            IntentKind::UpdateTask,
            IntentKind::DeleteTask,
            IntentKind::ToggleComplete,
            IntentKind::ToggleStar,
            IntentKind::CreateEvent,
        ]
    );
    // Event creation appears exactly once.
    assert_eq!(
        kinds.iter().filter(|k| **k == IntentKind::CreateEvent).count(),
        1
    );
}

#[test]
fn test_scenario_create_task() {
    let ctx = ParseContext::new(today(), &[]);
    let ParsedCommand::CreateTask(fields) =
        parse_command("create task math homework tomorrow at 6pm", &ctx)
    else {
        panic!("expected CreateTask");
    };
    assert_eq!(fields.title, "Math homework");
    assert_eq!(fields.due_date, today() + Duration::days(1));
    assert_eq!(fields.due_time.as_deref(), Some("06:00 PM"));
    assert_eq!(fields.priority, Priority::Medium);
    assert_eq!(fields.course, "General");
}

#[test]
fn test_scenario_delete_task() {
    let refs = math_homework();
    let ctx = ParseContext::new(today(), &refs);
    assert_eq!(
        route("delete the math homework task", Some(Mode::Create), &ctx),
        Routed::Command(ParsedCommand::DeleteTask {
            task_id: "3f2a-math".to_string()
        })
    );
}

#[test]
fn test_scenario_star_task() {
    let refs = math_homework();
    let ctx = ParseContext::new(today(), &refs);
    assert_eq!(
        route("star math homework", Some(Mode::Create), &ctx),
        Routed::Command(ParsedCommand::ToggleStar {
            task_id: "3f2a-math".to_string()
        })
    );
}

#[test]
fn test_earlier_classifier_wins_overlaps() {
    let refs = vec![
        TaskRef::new("t1", "Math homework"),
        TaskRef::new("t2", "Essay"),
    ];
    let ctx = ParseContext::new(today(), &refs);

    // "complete essay" would resolve, but creation is tried first.
    match parse_command("create a reminder to complete essay", &ctx) {
        ParsedCommand::CreateTask(fields) => assert_eq!(fields.title, "Reminder to complete essay"),
        other => panic!("expected CreateTask, got {:?}", other),
    }

    // Update is tried before toggle-complete.
    assert!(matches!(
        parse_command("update essay status to completed", &ctx),
        ParsedCommand::UpdateTask { .. }
    ));

    // Delete is tried before toggle-complete.
    assert_eq!(
        parse_command("remove the finished essay", &ctx),
        ParsedCommand::DeleteTask {
            task_id: "t2".to_string()
        }
    );
}

#[test]
fn test_events_reach_the_last_classifier() {
    let ctx = ParseContext::new(today(), &[]);
    match parse_command("schedule a meeting with advisor tomorrow at 3pm", &ctx) {
        ParsedCommand::CreateEvent(event) => {
            assert_eq!(event.title, "Meeting with advisor");
            assert_eq!(event.date, today() + Duration::days(1));
            assert_eq!(event.time.as_deref(), Some("03:00 PM"));
        }
        other => panic!("expected CreateEvent, got {:?}", other),
    }
}

#[test]
fn test_class_and_deadline_are_events() {
    let ctx = ParseContext::new(today(), &[]);
    match parse_command("schedule chemistry class tomorrow at 10am", &ctx) {
        ParsedCommand::CreateEvent(event) => {
            assert_eq!(event.title, "Chemistry class");
            assert_eq!(event.color, EventColor::Green);
            assert_eq!(event.date, today() + Duration::days(1));
            assert_eq!(event.time.as_deref(), Some("10:00 AM"));
        }
        other => panic!("expected CreateEvent, got {:?}", other),
    }
    match parse_command("add project deadline on friday", &ctx) {
        ParsedCommand::CreateEvent(event) => {
            assert_eq!(event.title, "Project deadline");
            assert_eq!(event.color, EventColor::Red);
            assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 1, 17).unwrap());
        }
        other => panic!("expected CreateEvent, got {:?}", other),
    }
}

#[test]
fn test_course_phrase_does_not_make_an_event() {
    let ctx = ParseContext::new(today(), &[]);
    match parse_command("add reading for my biology class due friday", &ctx) {
        ParsedCommand::CreateTask(task) => {
            assert_eq!(task.title, "Reading");
            assert_eq!(task.course, "biology");
        }
        other => panic!("expected CreateTask, got {:?}", other),
    }
}

#[test]
fn test_unresolved_reference_falls_through() {
    let refs = math_homework();
    let ctx = ParseContext::new(today(), &refs);
    assert_eq!(
        parse_command("delete chemistry notes", &ctx),
        ParsedCommand::Unrecognized
    );
    // A delete that names no known task can be picked up by a later classifier.
    assert!(matches!(
        parse_command("cancel the add-drop meeting", &ctx),
        ParsedCommand::CreateEvent(_)
    ));
}

#[test]
fn test_mode_inference() {
    assert_eq!(Mode::infer("Create task read chapter 2"), Mode::Create);
    assert_eq!(Mode::infer("please add task buy milk"), Mode::Create);
    assert_eq!(Mode::infer("what is photosynthesis?"), Mode::Ask);
    assert_eq!(Mode::infer("delete the essay"), Mode::Ask);
    assert_eq!("agent".parse::<Mode>(), Ok(Mode::Create));
    assert!("shout".parse::<Mode>().is_err());
}

#[test]
fn test_ask_mode_forwards_verbatim() {
    let refs = math_homework();
    let ctx = ParseContext::new(today(), &refs);
    let input = "  what's due for math homework?  ";
    assert_eq!(route(input, None, &ctx), Routed::Ask(input.to_string()));
    assert_eq!(
        route("star math homework", Some(Mode::Ask), &ctx),
        Routed::Ask("star math homework".to_string())
    );
}

#[test]
fn test_created_task_resolves_by_its_title() {
    let ctx = ParseContext::new(today(), &[]);
    let input = "create task lab report due friday";
    let ParsedCommand::CreateTask(fields) = parse_command(input, &ctx) else {
        panic!("expected CreateTask");
    };
    let title = fields.title.clone();

    let mut store = TaskStore::new();
    let created = store.add_task(fields);
    assert_eq!(resolve_task_id(&title, &store.snapshot()), Some(created.id));
}

#[test]
fn test_resolution_is_idempotent() {
    let refs = vec![
        TaskRef::new("a", "Read"),
        TaskRef::new("b", "Read chapter 4"),
    ];
    let text = "finish read chapter 4";
    let first = resolve_task_id(text, &refs);
    assert_eq!(first, resolve_task_id(text, &refs));
    // First in store order, not the longest title.
    assert_eq!(first.as_deref(), Some("a"));
}

#[test]
fn test_parsing_is_pure() {
    let refs = math_homework();
    let ctx = ParseContext::new(today(), &refs);
    let a = parse_command("create task essay due friday #english", &ctx);
    let b = parse_command("create task essay due friday #english", &ctx);
    assert_eq!(a, b);
}
