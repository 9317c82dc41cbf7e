use super::*;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use client_core::{ActionError, TaskApi};
use shared::domain::{Task, TaskId};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List,
    Create(String),
    Update(Task),
    Delete(TaskId),
}

struct PendingCall {
    call: Call,
    reply: oneshot::Sender<Result<Option<Task>>>,
}

/// Parks every request until the test answers it.
struct HeldApi {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl HeldApi {
    async fn hold(&self, call: Call) -> Result<Option<Task>> {
        let (reply, rx) = oneshot::channel();
        self.calls
            .send(PendingCall { call, reply })
            .map_err(|_| anyhow!("test harness dropped"))?;
        rx.await.map_err(|_| anyhow!("reply dropped"))?
    }
}

#[async_trait]
impl TaskApi for HeldApi {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.hold(Call::List).await.map(|_| fixture_tasks())
    }

    async fn create_task(&self, title: &str) -> Result<Task> {
        self.hold(Call::Create(title.to_string()))
            .await?
            .ok_or_else(|| anyhow!("no task in reply"))
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        self.hold(Call::Update(task.clone())).await.map(|_| ())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.hold(Call::Delete(id)).await.map(|_| ())
    }
}

fn task(id: i64, title: &str, completed: bool) -> Task {
    Task {
        id: TaskId(id),
        title: title.to_string(),
        completed,
    }
}

fn fixture_tasks() -> Vec<Task> {
    vec![
        task(1, "First Task", false),
        task(2, "Completed Task", true),
    ]
}

async fn loaded_shell() -> (Arc<TaskListController>, mpsc::UnboundedReceiver<PendingCall>) {
    let (tx, mut calls) = mpsc::unbounded_channel();
    let controller = TaskListController::new(Arc::new(HeldApi { calls: tx }));
    let Step::Started(load) = dispatch(&controller, ShellCommand::Reload) else {
        panic!("reload should start a request");
    };
    let pending = calls.recv().await.expect("list call");
    assert_eq!(pending.call, Call::List);
    let _ = pending.reply.send(Ok(None));
    load.await.expect("join");
    (controller, calls)
}

fn started(step: Step) -> JoinHandle<()> {
    match step {
        Step::Started(handle) => handle,
        other => panic!("expected a started action, got {other:?}"),
    }
}

#[tokio::test]
async fn back_to_back_adds_each_send_their_own_title() {
    let (controller, mut calls) = loaded_shell().await;

    let first = started(dispatch(&controller, ShellCommand::Add("Alpha".to_string())));
    let second = started(dispatch(&controller, ShellCommand::Add("Beta".to_string())));

    let mut titles = Vec::new();
    for id in [3, 4] {
        let pending = calls.recv().await.expect("create call");
        let Call::Create(title) = pending.call.clone() else {
            panic!("unexpected call {:?}", pending.call);
        };
        let _ = pending.reply.send(Ok(Some(task(id, &title, false))));
        titles.push(title);
    }
    first.await.expect("join");
    second.await.expect("join");

    titles.sort();
    assert_eq!(titles, vec!["Alpha".to_string(), "Beta".to_string()]);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.tasks.len(), 4);
    assert!(snapshot.tasks.iter().any(|t| t.title == "Alpha"));
    assert!(snapshot.tasks.iter().any(|t| t.title == "Beta"));
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn mutations_are_refused_while_a_change_is_in_flight() {
    let (controller, mut calls) = loaded_shell().await;

    let toggle = started(dispatch(&controller, ShellCommand::Toggle(1)));
    let pending = calls.recv().await.expect("update call");
    assert_eq!(pending.call, Call::Update(task(1, "First Task", true)));
    assert!(controller.snapshot().submitting);

    for command in [
        ShellCommand::Add("Later".to_string()),
        ShellCommand::Toggle(2),
        ShellCommand::Remove(2),
    ] {
        match dispatch(&controller, command) {
            Step::Notice(message) => assert_eq!(message, BUSY_MESSAGE),
            other => panic!("expected a refusal, got {other:?}"),
        }
    }
    assert!(calls.try_recv().is_err());

    assert!(matches!(dispatch(&controller, ShellCommand::Edit(2)), Step::Idle));
    match dispatch(&controller, ShellCommand::Save) {
        Step::Notice(message) => assert_eq!(message, BUSY_MESSAGE),
        other => panic!("expected a refusal, got {other:?}"),
    }

    let _ = pending.reply.send(Err(anyhow!("server unavailable")));
    toggle.await.expect("join");
    let snapshot = controller.snapshot();
    assert!(!snapshot.submitting);
    assert_eq!(snapshot.error, Some(ActionError::Toggle));

    let remove = started(dispatch(&controller, ShellCommand::Remove(2)));
    let pending = calls.recv().await.expect("delete call");
    assert_eq!(pending.call, Call::Delete(TaskId(2)));
    let _ = pending.reply.send(Ok(None));
    remove.await.expect("join");
    assert_eq!(controller.snapshot().tasks.len(), 1);
}

#[tokio::test]
async fn out_of_range_positions_are_reported() {
    let (controller, mut calls) = loaded_shell().await;

    match dispatch(&controller, ShellCommand::Toggle(9)) {
        Step::Notice(message) => assert_eq!(message, "no task 9"),
        other => panic!("expected a notice, got {other:?}"),
    }
    match dispatch(&controller, ShellCommand::Save) {
        Step::Notice(message) => assert_eq!(message, "nothing is being edited"),
        other => panic!("expected a notice, got {other:?}"),
    }
    assert!(calls.try_recv().is_err());
}
