// File: ./src/cli.rs
//! Command-line parsing and help text for the `scholar` binary.
use crate::intent::Mode;
use anyhow::{Result, bail};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Print the parsed command as JSON without applying it.
    Parse(String),
    /// Parse (or answer) and apply to the local workspace.
    Do(String),
    /// Send straight to the selected model.
    Ask(String),
    Tasks,
    Events,
    Models,
    SetModel(String),
    /// `(provider key, api key)`; no provider means the shared key.
    SetKey(Option<String>, String),
    ShowConfig,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub mode: Option<Mode>,
    pub command: CliCommand,
}

fn rest_as_text(rest: &[String], what: &str) -> Result<String> {
    let text = rest.join(" ");
    if text.trim().is_empty() {
        bail!("'{}' needs some text, e.g. scholar {} \"star essay\"", what, what);
    }
    Ok(text)
}

/// Parses `args` (without the binary name).
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut root = None;
    let mut verbose = false;
    let mut mode = None;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Ok(CliArgs {
                    root,
                    verbose,
                    mode,
                    command: CliCommand::Help,
                });
            }
            "-r" | "--root" => match iter.next() {
                Some(path) => root = Some(PathBuf::from(path)),
                None => bail!("--root requires a path"),
            },
            "-v" | "--verbose" => verbose = true,
            "-m" | "--mode" => match iter.next() {
                Some(m) => mode = Some(m.parse::<Mode>().map_err(anyhow::Error::msg)?),
                None => bail!("--mode requires 'create' or 'ask'"),
            },
            // Everything after the subcommand is free text.
            _ => {
                positional.push(arg.clone());
                positional.extend(iter.by_ref().cloned());
            }
        }
    }

    let Some((cmd, rest)) = positional.split_first() else {
        return Ok(CliArgs {
            root,
            verbose,
            mode,
            command: CliCommand::Help,
        });
    };

    let command = match cmd.as_str() {
        "parse" => CliCommand::Parse(rest_as_text(rest, "parse")?),
        "do" => CliCommand::Do(rest_as_text(rest, "do")?),
        "ask" => CliCommand::Ask(rest_as_text(rest, "ask")?),
        "tasks" => CliCommand::Tasks,
        "events" => CliCommand::Events,
        "models" => CliCommand::Models,
        "help" => CliCommand::Help,
        "config" => match rest {
            [] => CliCommand::ShowConfig,
            [sub, model] if sub == "set-model" => CliCommand::SetModel(model.clone()),
            [sub, key] if sub == "set-key" => CliCommand::SetKey(None, key.clone()),
            [sub, provider, key] if sub == "set-key" => {
                CliCommand::SetKey(Some(provider.clone()), key.clone())
            }
            _ => bail!("Usage: scholar config [set-model <id> | set-key [provider] <key>]"),
        },
        other => bail!("Unknown command '{}'. Try --help.", other),
    };

    Ok(CliArgs {
        root,
        verbose,
        mode,
        command,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Scholar v{} - Natural-language task commands and AI chat for students",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] <COMMAND> [TEXT...]", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    parse <text>                  Show how the text would be interpreted (JSON)");
    println!("    do <text>                     Run a command, or ask the model if it isn't one");
    println!("    ask <text>                    Ask the selected model");
    println!("    tasks                         List tasks with their status");
    println!("    events                        List calendar events");
    println!("    models                        List providers and models");
    println!("    config                        Show the current settings");
    println!("    config set-model <id>         Select the model used by 'ask'");
    println!("    config set-key [provider] <key>");
    println!("                                  Store an API key (shared, or for one provider)");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -m, --mode <mode>     Force 'create' (commands) or 'ask' (chat) for 'do'.");
    println!("    -v, --verbose         Debug logging (or set SCHOLAR_LOG=debug).");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!(
        "    {} do \"create task essay for History due friday at 5pm high priority\"",
        binary_name
    );
    println!("    {} --mode create do \"delete essay\"", binary_name);
    println!(
        "    {} --mode create do \"schedule study group meeting tomorrow at 3pm\"",
        binary_name
    );
    println!("    {} ask \"explain photosynthesis in two sentences\"", binary_name);
    println!();
}
