use anyhow::{Context, Result};
use chrono::Local;
use scholar::cli::{self, CliArgs, CliCommand};
use scholar::client::Dispatcher;
use scholar::config::{Config, Settings};
use scholar::context::StandardContext;
use scholar::controller;
use scholar::intent::{ParseContext, Routed, route};
use scholar::provider;
use scholar::storage::Workspace;
use scholar::store::TaskActions;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::env;

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        env::var("SCHOLAR_LOG")
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Warn)
    };
    let config = ConfigBuilder::new().build();
    // A logger may already be installed when embedded; that is not fatal.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let CliArgs {
        root,
        verbose,
        mode,
        command,
    } = cli::parse_args(&args)?;

    if command == CliCommand::Help {
        cli::print_help("scholar");
        return Ok(());
    }

    init_logging(verbose);
    let ctx = StandardContext::new(root);
    let mut config = Config::load_or_default(&ctx)?;

    match command {
        CliCommand::Parse(text) => {
            let workspace = Workspace::load(&ctx)?;
            let snapshot = workspace.tasks.snapshot();
            let pctx = ParseContext::now(&snapshot).with_default_course(&config.default_course);
            let json = match route(&text, mode, &pctx) {
                Routed::Command(cmd) => serde_json::to_string_pretty(&cmd)?,
                Routed::Ask(prompt) => serde_json::to_string_pretty(
                    &serde_json::json!({ "type": "Ask", "payload": prompt }),
                )?,
            };
            println!("{}", json);
        }
        CliCommand::Do(text) => {
            let mut workspace = Workspace::load(&ctx)?;
            let snapshot = workspace.tasks.snapshot();
            let pctx = ParseContext::now(&snapshot).with_default_course(&config.default_course);
            match route(&text, mode, &pctx) {
                Routed::Command(cmd) => {
                    let applied =
                        controller::apply_command(cmd, &mut workspace.tasks, &mut workspace.events);
                    if applied.changed {
                        workspace.save(&ctx)?;
                    }
                    println!("{}", applied.message);
                }
                Routed::Ask(prompt) => ask(&config, &prompt).await?,
            }
        }
        CliCommand::Ask(text) => ask(&config, &text).await?,
        CliCommand::Tasks => {
            let workspace = Workspace::load(&ctx)?;
            let now = Local::now().naive_local();
            if workspace.tasks.is_empty() {
                println!("No tasks.");
            }
            for task in &workspace.tasks.tasks {
                let star = if task.starred { "*" } else { " " };
                let due = match &task.due_time {
                    Some(t) => format!("{} {}", task.due_date, t),
                    None => task.due_date.to_string(),
                };
                println!(
                    "{} {:<30} {:<20} {:<8} {:<12} {}",
                    star,
                    task.title,
                    due,
                    task.priority.to_string(),
                    task.display_status(now).to_string(),
                    task.course
                );
            }
        }
        CliCommand::Events => {
            let workspace = Workspace::load(&ctx)?;
            if workspace.events.is_empty() {
                println!("No events.");
            }
            for event in &workspace.events.events {
                let time = event.time.as_deref().unwrap_or("all day");
                let duration = event.duration_label();
                println!(
                    "#{:<4} {} {:<10} {:<30} {:<7} {}",
                    event.id,
                    event.date,
                    time,
                    event.title,
                    event.color.to_string(),
                    duration
                );
            }
        }
        CliCommand::Models => {
            for p in provider::all_providers() {
                println!("{} ({:?})", p, p.route());
                for m in p.models {
                    let marker = if *m == config.selected_model() { "*" } else { " " };
                    println!("  {} {}", marker, m);
                }
            }
        }
        CliCommand::ShowConfig => {
            println!("Config file:    {}", Config::get_path_string(&ctx)?);
            println!("Model:          {}", config.selected_model);
            println!("Temperature:    {}", config.temperature);
            println!("Default course: {}", config.default_course);
            let shared = if config.api_key.is_some() { "set" } else { "not set" };
            println!("Shared key:     {}", shared);
            let mut keys: Vec<&String> = config.api_keys.keys().collect();
            keys.sort();
            for k in keys {
                println!("Key for {}:  set", k);
            }
        }
        CliCommand::SetModel(model) => {
            config.set_model(&model)?;
            config.save(&ctx)?;
            println!("Selected model {}", model);
        }
        CliCommand::SetKey(provider_key, key) => {
            match provider_key {
                Some(p) => {
                    let p = provider::provider_by_key(&p)
                        .with_context(|| format!("Unknown provider '{}'", p))?;
                    config.api_keys.insert(p.key.to_string(), key);
                    println!("Saved API key for {}", p);
                }
                None => {
                    config.api_key = Some(key);
                    println!("Saved shared API key");
                }
            }
            config.save(&ctx)?;
        }
        CliCommand::Help => cli::print_help("scholar"),
    }

    Ok(())
}

async fn ask(config: &Config, prompt: &str) -> Result<()> {
    let dispatcher = Dispatcher::from_config(config).map_err(anyhow::Error::msg)?;
    let reply = dispatcher.respond(config, prompt).await;
    println!("{}", reply);
    Ok(())
}
