// File: ./src/model/item.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type ListId = String;
pub type TaskId = String;

/// A named grouping of tasks, as returned by `GET /lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    #[serde(deserialize_with = "de_id")]
    pub id: ListId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "de_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Deadline, always UTC on the wire.
    pub limit: DateTime<Utc>,
    pub done: bool,
}

/// Body of `GET /lists/{id}/tasks`. Other top-level fields are ignored.
#[derive(Debug, Deserialize)]
pub struct TaskPage {
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub tasks: Vec<Task>,
}

// `"tasks": null` means the list has nothing in it.
fn de_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Task>>::deserialize(deserializer)?.unwrap_or_default())
}

// Some deployments hand out numeric ids, others UUID strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

impl Task {
    pub fn done_label(&self) -> &'static str {
        if self.done { "Done" } else { "Todo" }
    }

    /// API path of this task inside `list_id`.
    pub fn resource_path(&self, list_id: &str) -> String {
        format!("/lists/{}/tasks/{}", list_id, self.id)
    }
}
