#![cfg(not(tarpaulin_include))]

use clap::Parser;
use portfolio::client::HttpContentClient;
use portfolio::content::{
    ExperienceJob, ExperienceJobPatch, SectionKey, WorkProject, WorkProjectPatch,
};
use portfolio::edit::{EditMode, EditSession};
use serde::de::DeserializeOwned;
use std::io::{self, Write};

/// Edit the content of a running portfolio server from the terminal
#[derive(Parser, Debug)]
#[command(name = "portfolio-cli", version)]
struct Args {
    /// Base URL of the server
    #[arg(long, env = "PORTFOLIO_URL", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Edit password; the same value the server is started with
    #[arg(long, env = "EDIT_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

fn print_help() {
    println!("Commands:");
    println!("  login <password>            Enter edit mode");
    println!("  logout                      Leave edit mode, keep local changes");
    println!("  toggle                      Switch between editing and read-only");
    println!("  show [section]              Print the working copy");
    println!("  set <section> <text>        Replace a text section");
    println!("  skill add <text>");
    println!("  skill update <i> <text>");
    println!("  skill rm <i>");
    println!("  project add <json>");
    println!("  project update <i> <json>");
    println!("  project rm <i>");
    println!("  job add <json>");
    println!("  job update <i> <json>");
    println!("  job rm <i>");
    println!("  save                        Publish everything and reload");
    println!("  cancel                      Drop local changes and reload");
    println!("  q                           Quit");
    println!(
        "Sections: {}",
        SectionKey::ALL
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid json: {}", e))
}

fn parse_index(raw: &str) -> Result<usize, String> {
    raw.parse().map_err(|_| format!("invalid index: {}", raw))
}

/// Split `"<i> <rest>"` into an index and the remainder
fn index_and_rest(args: &str) -> Result<(usize, &str), String> {
    let (index, rest) = args.split_once(' ').unwrap_or((args, ""));
    Ok((parse_index(index)?, rest.trim()))
}

fn applied(changed: bool) -> String {
    if changed {
        String::from("ok")
    } else {
        String::from("no change")
    }
}

fn show(session: &EditSession, section: Option<&str>) -> Result<(), String> {
    let content = session.content();
    match section {
        Some(name) => {
            let key: SectionKey = name.parse()?;
            println!("{}", content.field(key));
        }
        None => {
            let rendered =
                serde_json::to_string_pretty(content).map_err(|e| e.to_string())?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

/// Apply one mutation command; `Err` carries the status line
fn mutate(session: &mut EditSession, group: &str, args: &str) -> Result<String, String> {
    let (action, rest) = args.split_once(' ').unwrap_or((args, ""));
    let rest = rest.trim();

    let changed = match (group, action) {
        ("skill", "add") => session.add_skill(rest),
        ("skill", "update") => {
            let (index, text) = index_and_rest(rest)?;
            session.update_skill(index, text)
        }
        ("skill", "rm") => session.remove_skill(parse_index(rest)?),
        ("project", "add") => session.add_work_project(parse_json::<WorkProject>(rest)?),
        ("project", "update") => {
            let (index, json) = index_and_rest(rest)?;
            session.update_work_project(index, parse_json::<WorkProjectPatch>(json)?)
        }
        ("project", "rm") => session.remove_work_project(parse_index(rest)?),
        ("job", "add") => session.add_experience_job(parse_json::<ExperienceJob>(rest)?),
        ("job", "update") => {
            let (index, json) = index_and_rest(rest)?;
            session.update_experience_job(index, parse_json::<ExperienceJobPatch>(json)?)
        }
        ("job", "rm") => session.remove_experience_job(parse_index(rest)?),
        _ => return Err(String::from("invalid command")),
    };
    Ok(applied(changed))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let client = HttpContentClient::new(&args.server);
    let mut session = EditSession::new(args.password);

    session.load(&client).await?;
    println!("Loaded content from {}", client.endpoint());

    let mut status = String::from("ok");
    loop {
        let mode = match session.mode() {
            EditMode::Anonymous => "view",
            EditMode::ReadOnly => "read-only",
            EditMode::Editing => "editing",
        };
        let marker = if session.is_dirty() { "*" } else { "" };
        print!("[{}{}] ({}) > ", mode, marker, status);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let result: Result<String, String> = match command {
            "q" | "quit" => break,
            "help" => {
                print_help();
                Ok(String::from("ok"))
            }
            "login" => session
                .authenticate(rest)
                .map(|_| String::from("ok"))
                .map_err(|e| e.to_string()),
            "logout" => {
                session.logout();
                Ok(String::from("ok"))
            }
            "toggle" => {
                session.toggle_editing();
                Ok(String::from("ok"))
            }
            "show" => show(&session, Some(rest).filter(|s| !s.is_empty()))
                .map(|_| String::from("ok")),
            "set" => {
                let (name, text) = rest.split_once(' ').unwrap_or((rest, ""));
                name.parse::<SectionKey>()
                    .map(|key| applied(session.set_field(key, text.trim())))
            }
            "skill" | "project" | "job" => mutate(&mut session, command, rest),
            "save" => session
                .save_all(&client)
                .await
                .map(|_| String::from("saved"))
                .map_err(|e| e.to_string()),
            "cancel" => session
                .cancel(&client)
                .await
                .map(|_| String::from("ok"))
                .map_err(|e| e.to_string()),
            _ => Err(String::from("invalid command")),
        };

        status = result.unwrap_or_else(|message| message);
    }

    Ok(())
}
