// File: ./src/worker.rs
// Network actor: turns Actions into HTTP calls and reports AppEvents.
use crate::action::{Action, AppEvent};
use crate::client::ApiClient;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Default)]
struct InFlight {
    lists: Option<JoinHandle<()>>,
    tasks: Option<JoinHandle<()>>,
}

impl InFlight {
    fn replace(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
        if let Some(old) = slot.replace(handle)
            && !old.is_finished()
        {
            debug!("aborting superseded fetch");
            old.abort();
        }
    }

    fn abort_all(&mut self) {
        for handle in [self.lists.take(), self.tasks.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}

/// Runs until `Action::Quit` arrives or the action channel closes.
///
/// Each fetch runs in its own task. A new request of the same kind aborts
/// the previous one, so only the latest selection can report back.
pub async fn run(
    client: ApiClient,
    mut action_rx: mpsc::Receiver<Action>,
    event_tx: mpsc::Sender<AppEvent>,
) {
    let mut in_flight = InFlight::default();

    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,

            Action::LoadLists => {
                let client = client.clone();
                let tx = event_tx.clone();
                let handle = tokio::spawn(async move {
                    let event = match client.get_lists().await {
                        Ok(lists) => AppEvent::ListsLoaded(lists),
                        Err(e) => AppEvent::ListsFailed(e.to_string()),
                    };
                    let _ = tx.send(event).await;
                });
                InFlight::replace(&mut in_flight.lists, handle);
            }

            Action::LoadTasks(list_id) => {
                let client = client.clone();
                let tx = event_tx.clone();
                let handle = tokio::spawn(async move {
                    let event = match client.get_tasks(&list_id).await {
                        Ok(tasks) => AppEvent::TasksLoaded { list_id, tasks },
                        Err(e) => AppEvent::TasksFailed {
                            list_id,
                            message: e.to_string(),
                        },
                    };
                    let _ = tx.send(event).await;
                });
                InFlight::replace(&mut in_flight.tasks, handle);
            }
        }
    }

    in_flight.abort_all();
    info!("network worker stopped");
}

/// Spawns [`run`] and returns the channel ends the UI loop talks to.
pub fn spawn(
    client: ApiClient,
) -> (
    mpsc::Sender<Action>,
    mpsc::Receiver<AppEvent>,
    JoinHandle<()>,
) {
    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, event_rx) = mpsc::channel(10);
    let handle = tokio::spawn(run(client, action_rx, event_tx));
    (action_tx, event_rx, handle)
}
