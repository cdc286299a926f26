//! Taskline CLI - a command-line client for a remote task service.

use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use taskline::{App, FileTokenStore, Status, StatusFilter, Task, TaskDraft, TaskStore, TokenStore};

mod cli;

use cli::{Cli, Command};

const DEFAULT_API_URL: &str = "http://localhost:5000/api";

fn setup_logging() -> Result<()> {
    let log_dir = data_dir().join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("taskline.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskline")
}

fn api_url(cli: &Cli) -> String {
    cli.api_url
        .clone()
        .or_else(|| std::env::var("TASKLINE_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

fn format_status(status: &Status) -> ColoredString {
    match status {
        Status::Open => "open".green(),
        Status::Complete => "complete".blue(),
    }
}

fn parse_due(due: &str) -> Result<chrono::NaiveDate> {
    due.parse()
        .with_context(|| format!("Invalid due date '{}', expected YYYY-MM-DD", due))
}

fn print_task(task: &Task) {
    let due = task
        .due_date
        .map(|d| format!(" due {}", d))
        .unwrap_or_default();
    println!(
        "{} {} {}{}{}",
        format_status(&task.status),
        task.id.cyan(),
        task.title,
        due.dimmed(),
        task.description
            .as_deref()
            .map(|d| format!("\n    {}", d.dimmed()))
            .unwrap_or_default()
    );
}

/// Surface a captured store error as a command failure.
fn ensure_ok(tasks: &TaskStore) -> Result<()> {
    if let Some(message) = tasks.error() {
        bail!("{}", message);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let tokens = Arc::new(FileTokenStore::new(data_dir().join("token.json")));
    let stored_token = tokens.load().context("Failed to read stored token")?;
    let mut app = App::new(api_url(&cli), tokens);

    match cli.command {
        Command::Login { email, password } => {
            let user = app
                .session
                .login_with_credentials(&email, &password)
                .await
                .context("Login failed")?;
            println!("{} Logged in as {}", "✓".green(), user.name.cyan());
        }

        Command::Register {
            name,
            email,
            password,
        } => {
            let user = app
                .session
                .register_with_credentials(&name, &email, &password)
                .await
                .context("Registration failed")?;
            println!("{} Registered and logged in as {}", "✓".green(), user.name.cyan());
        }

        Command::Oauth { provider } => {
            println!("Open this URL in a browser to log in with {}:", provider.cyan());
            println!("  {}", app.session.auth_url(&provider));
            println!(
                "Then finish with: {} {}",
                "tsk token".bold(),
                "<token-from-redirect>".dimmed()
            );
        }

        Command::Token { token } => {
            app.session.complete_token_login(&token).await?;
            match app.session.user() {
                Some(user) => println!("{} Logged in as {}", "✓".green(), user.name.cyan()),
                None => bail!(
                    "{}",
                    app.session.error().unwrap_or("Failed to authenticate")
                ),
            }
        }

        Command::Logout => {
            app.logout();
            println!("{} Logged out", "✓".green());
        }

        Command::Whoami => {
            let Some(token) = stored_token else {
                println!("{}", "Not logged in".dimmed());
                std::process::exit(1);
            };
            app.session.complete_token_login(&token).await?;
            match app.session.user() {
                Some(user) => {
                    println!("{}: {}", "Name".bold(), user.name);
                    if let Some(email) = &user.email {
                        println!("{}: {}", "Email".bold(), email);
                    }
                    println!("{}: {}", "ID".bold(), user.id.cyan());
                }
                None => bail!(
                    "{}",
                    app.session.error().unwrap_or("Failed to authenticate")
                ),
            }
        }

        Command::List { status, search } => {
            app.tasks.fetch_all().await;
            ensure_ok(&app.tasks)?;

            let filter = match status.as_deref() {
                Some("open") => StatusFilter::Open,
                Some("complete") => StatusFilter::Complete,
                Some(other) => bail!("Unknown status '{}', expected open or complete", other),
                None => StatusFilter::All,
            };

            let tasks = app.tasks.filtered(search.as_deref().unwrap_or(""), filter);
            if tasks.is_empty() {
                println!("{}", "No tasks found".dimmed());
            } else {
                for task in tasks {
                    print_task(task);
                }
            }
        }

        Command::Add {
            title,
            description,
            due,
        } => {
            let mut draft = TaskDraft::new(title);
            draft.description = description;
            draft.due_date = due.as_deref().map(parse_due).transpose()?;

            app.tasks.create(draft).await;
            ensure_ok(&app.tasks)?;

            // The new task is prepended by the store
            if let Some(task) = app.tasks.tasks().first() {
                println!("{} Created: {} {}", "✓".green(), task.id.cyan(), task.title);
            }
        }

        Command::Edit {
            id,
            title,
            description,
            due,
        } => {
            app.tasks.fetch_all().await;
            ensure_ok(&app.tasks)?;

            let Some(existing) = app.tasks.get(&id) else {
                bail!("Task not found: {}", id);
            };

            let mut draft = existing.to_draft();
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = Some(description);
            }
            if let Some(due) = due {
                draft.due_date = Some(parse_due(&due)?);
            }

            app.tasks.update(&id, draft).await;
            ensure_ok(&app.tasks)?;

            if let Some(task) = app.tasks.get(&id) {
                println!("{} Updated: {} {}", "✓".green(), task.id.cyan(), task.title);
            }
        }

        Command::Done { id } => {
            app.tasks.fetch_all().await;
            ensure_ok(&app.tasks)?;

            if app.tasks.get(&id).is_none() {
                bail!("Task not found: {}", id);
            }

            app.tasks.toggle_status(&id).await;
            ensure_ok(&app.tasks)?;

            if let Some(task) = app.tasks.get(&id) {
                println!(
                    "{} {} is now {}",
                    "✓".green(),
                    task.id.cyan(),
                    format_status(&task.status)
                );
            }
        }

        Command::Rm { id } => {
            app.tasks.remove(&id).await;
            ensure_ok(&app.tasks)?;
            println!("{} Deleted: {}", "✓".green(), id.cyan());
        }

        Command::Stats => {
            app.tasks.fetch_all().await;
            ensure_ok(&app.tasks)?;

            let stats = app.tasks.stats();
            println!("{}: {}", "Open".bold(), stats.open);
            println!("{}: {}", "Complete".bold(), stats.complete);
            println!("{}: {}", "Overdue".bold(), stats.overdue);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
