use crate::model::{List, ListId, Task};

/// Requests sent from the UI loop to the network actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadLists,
    LoadTasks(ListId),
    Quit,
}

/// Results sent back from the network actor.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ListsLoaded(Vec<List>),
    ListsFailed(String),
    TasksLoaded { list_id: ListId, tasks: Vec<Task> },
    TasksFailed { list_id: ListId, message: String },
}
