use std::io::Write;

use anyhow::{Context, anyhow, bail};
use taskdeck_core::error::GENERIC_ERROR_MESSAGE;
use taskdeck_core::shared::{EntityId, TaskDto, is_dot_segment};
use taskdeck_core::{
    AppState, AuthForm, AuthMode, AuthOutcome, KeyValueStore, Phase, TaskForm, TaskOutcome,
    TaskdeckClient, Transport,
};
use tracing::{debug, instrument};

use crate::cli::Command;

/// Runs one command against a client whose stored session, if any, has
/// not been resumed yet. Only commands that read or change tasks resume
/// it; the rest never touch the network for it.
#[instrument(skip_all)]
pub async fn dispatch<T, S, W>(
    client: &TaskdeckClient<T, S>,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()>
where
    T: Transport,
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let mut form = AuthForm::new(AuthMode::Register);
            form.name = name;
            form.email = email;
            form.password = password;
            authenticate(client, form, out).await
        }
        Command::Login { email, password } => {
            let mut form = AuthForm::new(AuthMode::Login);
            form.email = email;
            form.password = password;
            authenticate(client, form, out).await?;
            render_tasks(&client.snapshot(), out)
        }
        Command::Logout => {
            if client.phase() == Phase::LoggedOut {
                writeln!(out, "not logged in")?;
                return Ok(());
            }
            client.logout();
            print_notice(&client.snapshot(), out)
        }
        Command::Whoami => {
            let state = require_session(client).await?;
            match state.user() {
                Some(user) => writeln!(out, "{} <{}>", user.name, user.email)?,
                None => writeln!(out, "(profile unavailable)")?,
            }
            Ok(())
        }
        Command::List => {
            let state = require_session(client).await?;
            render_tasks(&state, out)
        }
        Command::Add {
            title,
            category,
            priority,
        } => {
            require_session(client).await?;
            let mut form = TaskForm::new();
            form.title = title;
            form.category = category;
            form.priority = priority;
            let Some(task) = form.begin_submit() else {
                bail!("invalid task: {}", form.errors);
            };
            let outcome = client.submit_task(task).await;
            form.finish(&outcome);
            if outcome == TaskOutcome::Failed {
                return Err(failure(client));
            }
            finish_mutation(client, out)
        }
        Command::Toggle { id } => {
            let state = require_session(client).await?;
            let task = known_task(&state, &id)?;
            client
                .toggle_task(&task.id, task.completed)
                .await
                .map_err(|_| failure(client))?;
            finish_mutation(client, out)
        }
        Command::Rm { id } => {
            let state = require_session(client).await?;
            let task = known_task(&state, &id)?;
            client
                .remove_task(&task.id)
                .await
                .map_err(|_| failure(client))?;
            finish_mutation(client, out)
        }
        Command::Theme { action } => {
            let theme = if action.is_some() {
                client.toggle_theme()
            } else {
                client.snapshot().theme()
            };
            writeln!(out, "theme: {}", theme.storage_value())?;
            Ok(())
        }
    }
}

async fn authenticate<T, S, W>(
    client: &TaskdeckClient<T, S>,
    mut form: AuthForm,
    out: &mut W,
) -> anyhow::Result<()>
where
    T: Transport,
    S: KeyValueStore,
    W: Write,
{
    let Some(submission) = form.begin_submit() else {
        bail!("invalid input: {}", form.errors);
    };

    let outcome = client.submit_auth(submission).await;
    form.finish(&outcome);
    match outcome {
        AuthOutcome::Failed => Err(failure(client)),
        AuthOutcome::SignedIn if client.phase() != Phase::LoggedIn => Err(failure(client)),
        AuthOutcome::SignedIn | AuthOutcome::Registered => print_notice(&client.snapshot(), out),
    }
}

/// Resumes the stored session and returns the synchronized state.
async fn require_session<T, S>(client: &TaskdeckClient<T, S>) -> anyhow::Result<AppState>
where
    T: Transport,
    S: KeyValueStore,
{
    client.start().await;
    debug!(phase = client.phase().as_str(), "session resumed");

    let state = client.snapshot();
    if state.phase() != Phase::LoggedIn {
        bail!("not logged in (run `taskdeck login`)");
    }
    Ok(state)
}

/// Task ids on the command line must name a task the server listed.
fn known_task(state: &AppState, raw: &str) -> anyhow::Result<TaskDto> {
    let raw = raw.trim();
    if raw.is_empty() || is_dot_segment(raw) {
        bail!("invalid task id {raw:?}");
    }
    let id = EntityId::from(raw);
    state
        .tasks()
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .with_context(|| format!("no task with id {id}"))
}

fn finish_mutation<T, S, W>(client: &TaskdeckClient<T, S>, out: &mut W) -> anyhow::Result<()>
where
    T: Transport,
    S: KeyValueStore,
    W: Write,
{
    let state = client.snapshot();
    print_notice(&state, out)?;
    render_tasks(&state, out)
}

/// The visible error notice, as an error for the process exit.
fn failure<T, S>(client: &TaskdeckClient<T, S>) -> anyhow::Error
where
    T: Transport,
    S: KeyValueStore,
{
    let message = client.with_state(|state| {
        state
            .feedback()
            .current()
            .filter(|n| n.kind == taskdeck_core::NoticeKind::Error)
            .map(|n| n.message.clone())
    });
    anyhow!(message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()))
}

pub fn print_notice<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    if let Some(notice) = state.feedback().current() {
        writeln!(out, "[{}] {}", notice.kind.as_str(), notice.message)?;
    }
    Ok(())
}

pub fn render_tasks<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    if state.phase() != Phase::LoggedIn {
        return Ok(());
    }

    let name = state.user().map(|u| u.name.as_str()).unwrap_or_default();
    writeln!(out, "Hello, {name}")?;
    writeln!(out, "{} pending tasks", state.pending_count())?;

    if state.tasks().is_empty() {
        writeln!(out, "No tasks found. Add your first task to get started!")?;
        return Ok(());
    }

    let id_width = state
        .tasks()
        .iter()
        .map(|t| t.id.as_str().len())
        .max()
        .unwrap_or(0);
    for task in state.tasks() {
        writeln!(
            out,
            "[{}] {:<id_width$}  {}  ({}, {})",
            if task.completed { "x" } else { " " },
            task.id.as_str(),
            task.title,
            task.category,
            task.priority,
        )?;
    }
    Ok(())
}
