// File: ./src/render.rs
use crate::model::{DoneFilter, Remaining, Task, format_limit};
use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

/// One displayable task with its derived date values.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow<'a> {
    pub task: &'a Task,
    pub deadline: String,
    pub remaining: Remaining,
    pub resource_path: Option<String>,
}

impl TaskRow<'_> {
    pub fn done_label(&self) -> &'static str {
        self.task.done_label()
    }
}

/// Filters `tasks` by `filter` and computes the deadline columns.
///
/// Nothing is cached: calling this again later yields a fresh countdown
/// for the new `now`.
pub fn render_tasks<'a, Tz>(
    tasks: &'a [Task],
    list_id: Option<&str>,
    filter: DoneFilter,
    now: DateTime<Utc>,
    tz: &Tz,
    date_format: &str,
) -> Vec<TaskRow<'a>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    filter
        .apply(tasks)
        .map(|task| TaskRow {
            task,
            deadline: format_limit(task.limit, tz, date_format),
            remaining: Remaining::between(task.limit, now),
            resource_path: list_id.map(|id| task.resource_path(id)),
        })
        .collect()
}
