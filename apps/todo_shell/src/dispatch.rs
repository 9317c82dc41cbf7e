//! Turns parsed shell commands into controller calls.

use std::sync::Arc;

use client_core::{view::render_lines, LocalId, TaskListController};
use tokio::task::JoinHandle;

use crate::commands::{ShellCommand, HELP};

pub const BUSY_MESSAGE: &str = "still saving changes, try again in a moment";

#[derive(Debug)]
pub enum Step {
    Idle,
    Quit,
    Notice(String),
    Started(JoinHandle<()>),
}

/// Runs one command. Remote actions are spawned so the prompt never blocks;
/// their results arrive as snapshots. Mutations are refused while another
/// one is still in flight, matching the disabled state the view shows.
pub fn dispatch(controller: &Arc<TaskListController>, command: ShellCommand) -> Step {
    if command.mutates() && controller.snapshot().submitting {
        return Step::Notice(BUSY_MESSAGE.to_string());
    }

    match command {
        ShellCommand::Quit => Step::Quit,
        ShellCommand::Help => Step::Notice(HELP.to_string()),
        ShellCommand::List => Step::Notice(render_lines(&controller.snapshot()).join("\n")),
        ShellCommand::Reload => spawn_action(controller, |c| async move {
            let _ = c.load().await;
        }),
        ShellCommand::Add(title) => spawn_action(controller, move |c| async move {
            c.add(&title).await;
        }),
        ShellCommand::Draft(text) => {
            controller.set_draft(text);
            Step::Idle
        }
        ShellCommand::Cancel => {
            controller.cancel_edit();
            Step::Idle
        }
        ShellCommand::Save => {
            let Some(id) = controller.snapshot().editing.map(|slot| slot.id) else {
                return Step::Notice("nothing is being edited".to_string());
            };
            spawn_action(controller, move |c| async move {
                c.save_edit(id).await;
            })
        }
        ShellCommand::Edit(n) => match task_at(controller, n) {
            Ok(id) if controller.begin_edit(id) => Step::Idle,
            Ok(_) => Step::Notice(format!("task {n} is still being saved")),
            Err(step) => step,
        },
        ShellCommand::Toggle(n) => match task_at(controller, n) {
            Ok(id) => spawn_action(controller, move |c| async move {
                c.toggle(id).await;
            }),
            Err(step) => step,
        },
        ShellCommand::Remove(n) => match task_at(controller, n) {
            Ok(id) => spawn_action(controller, move |c| async move {
                c.remove(id).await;
            }),
            Err(step) => step,
        },
    }
}

fn spawn_action<F, Fut>(controller: &Arc<TaskListController>, action: F) -> Step
where
    F: FnOnce(Arc<TaskListController>) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    Step::Started(tokio::spawn(action(controller.clone())))
}

fn task_at(controller: &TaskListController, position: usize) -> Result<LocalId, Step> {
    controller
        .snapshot()
        .tasks
        .get(position.saturating_sub(1))
        .map(|task| task.id)
        .ok_or_else(|| Step::Notice(format!("no task {position}")))
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
