// File: ./src/model/filter.rs
// Done / not-done partitioning of a task collection
use crate::model::item::Task;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoneFilter {
    #[default]
    Todo,
    Done,
}

impl DoneFilter {
    pub fn matches(self, task: &Task) -> bool {
        task.done == (self == DoneFilter::Done)
    }

    pub fn toggled(self) -> Self {
        match self {
            DoneFilter::Todo => DoneFilter::Done,
            DoneFilter::Done => DoneFilter::Todo,
        }
    }

    /// Keeps the original order.
    pub fn apply<'a>(self, tasks: &'a [Task]) -> impl Iterator<Item = &'a Task> + 'a {
        tasks.iter().filter(move |t| self.matches(t))
    }
}

impl fmt::Display for DoneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoneFilter::Todo => write!(f, "Todo"),
            DoneFilter::Done => write!(f, "Done"),
        }
    }
}
