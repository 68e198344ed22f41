// File: ./src/store.rs
// Page state: lists, tasks of the selected list, filter and error line.
use crate::action::{Action, AppEvent};
use crate::model::{DoneFilter, List, ListId, Task};
use crate::render::{TaskRow, render_tasks};
use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct PageStore {
    lists: Vec<List>,
    tasks: Vec<Task>,
    selected: Option<ListId>,
    // List the current `tasks` came from. Can lag `selected` after a failed fetch.
    tasks_for: Option<ListId>,
    filter: DoneFilter,
    error: Option<String>,
    loading: bool,
}

impl PageStore {
    pub fn new(filter: DoneFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn start(&mut self) -> Action {
        self.loading = true;
        Action::LoadLists
    }

    pub fn refresh(&mut self) -> Action {
        self.start()
    }

    /// Folds a worker result into the page. The returned action, if any,
    /// must be forwarded to the worker.
    pub fn apply(&mut self, event: AppEvent) -> Option<Action> {
        match event {
            AppEvent::ListsLoaded(lists) => {
                info!(count = lists.len(), "lists loaded");
                self.lists = lists;
                self.error = None;

                let keep = self
                    .selected
                    .as_ref()
                    .filter(|id| self.lists.iter().any(|l| &l.id == *id))
                    .cloned();
                let target = keep.or_else(|| self.lists.first().map(|l| l.id.clone()));

                match target {
                    Some(id) => {
                        self.selected = Some(id.clone());
                        Some(Action::LoadTasks(id))
                    }
                    None => {
                        self.selected = None;
                        self.tasks.clear();
                        self.tasks_for = None;
                        self.loading = false;
                        None
                    }
                }
            }
            AppEvent::ListsFailed(message) => {
                warn!(%message, "list fetch failed");
                self.error = Some(format!("Failed to load lists: {}", message));
                self.loading = false;
                None
            }
            AppEvent::TasksLoaded { list_id, tasks } => {
                if self.selected.as_deref() != Some(list_id.as_str()) {
                    debug!(%list_id, "discarding tasks for a list that is no longer selected");
                    return None;
                }
                info!(%list_id, count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                self.tasks_for = Some(list_id);
                self.error = None;
                self.loading = false;
                None
            }
            AppEvent::TasksFailed { list_id, message } => {
                if self.selected.as_deref() != Some(list_id.as_str()) {
                    debug!(%list_id, "ignoring failure for a list that is no longer selected");
                    return None;
                }
                warn!(%list_id, %message, "task fetch failed");
                // previous tasks stay on screen
                self.error = Some(format!("Failed to load tasks: {}", message));
                self.loading = false;
                None
            }
        }
    }

    /// Selects `id` if it is one of the loaded lists.
    pub fn select_list(&mut self, id: &str) -> Option<Action> {
        if !self.lists.iter().any(|l| l.id == id) {
            warn!(list_id = id, "selection of unknown list ignored");
            return None;
        }
        self.selected = Some(id.to_string());
        self.loading = true;
        Some(Action::LoadTasks(id.to_string()))
    }

    pub fn set_filter(&mut self, filter: DoneFilter) {
        self.filter = filter;
    }

    /// Resource paths use the list the tasks were fetched from, which can
    /// differ from the selection after a failed fetch.
    pub fn rows<'a, Tz>(
        &'a self,
        now: DateTime<Utc>,
        tz: &Tz,
        date_format: &str,
    ) -> Vec<TaskRow<'a>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        render_tasks(
            &self.tasks,
            self.tasks_for.as_deref(),
            self.filter,
            now,
            tz,
            date_format,
        )
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_list(&self) -> Option<&List> {
        let id = self.selected.as_deref()?;
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn tasks_for(&self) -> Option<&str> {
        self.tasks_for.as_deref()
    }

    pub fn filter(&self) -> DoneFilter {
        self.filter
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_DATE_FORMAT;
    use chrono::TimeZone;

    fn list(id: &str) -> List {
        List {
            id: id.to_string(),
            title: format!("List {}", id),
        }
    }

    fn task(id: &str, done: bool) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {}", id),
            detail: None,
            limit: Utc.with_ymd_and_hms(2025, 5, 23, 4, 1, 0).unwrap(),
            done,
        }
    }

    fn loaded(list_id: &str, tasks: Vec<Task>) -> AppEvent {
        AppEvent::TasksLoaded {
            list_id: list_id.to_string(),
            tasks,
        }
    }

    #[test]
    fn first_list_load_selects_first_list() {
        let mut store = PageStore::new(DoneFilter::Todo);
        assert_eq!(store.start(), Action::LoadLists);
        assert!(store.is_loading());

        let next = store.apply(AppEvent::ListsLoaded(vec![list("a"), list("b")]));
        assert_eq!(next, Some(Action::LoadTasks("a".to_string())));
        assert_eq!(store.selected(), Some("a"));
    }

    #[test]
    fn failed_list_load_sets_error_and_fetches_nothing() {
        let mut store = PageStore::new(DoneFilter::Todo);
        store.start();
        let next = store.apply(AppEvent::ListsFailed("401 Unauthorized: nope".to_string()));
        assert_eq!(next, None);
        assert!(store.lists().is_empty());
        assert_eq!(store.selected(), None);
        assert_eq!(
            store.error(),
            Some("Failed to load lists: 401 Unauthorized: nope")
        );
        assert!(!store.is_loading());
    }

    #[test]
    fn empty_list_collection_selects_nothing() {
        let mut store = PageStore::new(DoneFilter::Todo);
        assert_eq!(store.apply(AppEvent::ListsLoaded(vec![])), None);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn selecting_known_list_yields_one_fetch() {
        let mut store = PageStore::new(DoneFilter::Todo);
        store.apply(AppEvent::ListsLoaded(vec![list("a"), list("b")]));

        assert_eq!(
            store.select_list("b"),
            Some(Action::LoadTasks("b".to_string()))
        );
        assert_eq!(store.selected(), Some("b"));
        assert_eq!(store.select_list("zzz"), None);
        assert_eq!(store.selected(), Some("b"));
    }

    #[test]
    fn stale_tasks_are_discarded() {
        let mut store = PageStore::new(DoneFilter::Todo);
        store.apply(AppEvent::ListsLoaded(vec![list("a"), list("b")]));
        store.select_list("b");

        // the response for "a" arrives after "b" was selected
        assert_eq!(store.apply(loaded("a", vec![task("x", false)])), None);
        assert!(store.tasks().is_empty());

        store.apply(loaded("b", vec![task("y", false)]));
        assert_eq!(store.tasks()[0].id, "y");
        assert_eq!(store.tasks_for(), Some("b"));
        assert!(!store.is_loading());
    }

    #[test]
    fn failed_task_fetch_keeps_previous_tasks() {
        let mut store = PageStore::new(DoneFilter::Todo);
        store.apply(AppEvent::ListsLoaded(vec![list("a"), list("b")]));
        store.apply(loaded("a", vec![task("x", false)]));

        store.select_list("b");
        store.apply(AppEvent::TasksFailed {
            list_id: "b".to_string(),
            message: "request failed".to_string(),
        });

        assert_eq!(store.selected(), Some("b"));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks_for(), Some("a"));
        assert_eq!(store.error(), Some("Failed to load tasks: request failed"));

        // next success clears the message
        store.apply(loaded("b", vec![]));
        assert_eq!(store.error(), None);
    }

    #[test]
    fn kept_tasks_point_at_their_own_list_after_failed_fetch() {
        let mut store = PageStore::new(DoneFilter::Todo);
        store.apply(AppEvent::ListsLoaded(vec![list("a"), list("b")]));
        store.apply(loaded("a", vec![task("x", false)]));
        store.select_list("b");
        store.apply(AppEvent::TasksFailed {
            list_id: "b".to_string(),
            message: "boom".to_string(),
        });

        let now = Utc.with_ymd_and_hms(2025, 5, 22, 4, 0, 0).unwrap();
        let rows = store.rows(now, &Utc, DEFAULT_DATE_FORMAT);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].resource_path.as_deref(), Some("/lists/a/tasks/x"));
        assert_eq!(store.tasks_for(), Some("a"));
        assert_eq!(store.selected(), Some("b"));
    }

    #[test]
    fn refresh_keeps_existing_selection() {
        let mut store = PageStore::new(DoneFilter::Todo);
        store.apply(AppEvent::ListsLoaded(vec![list("a"), list("b")]));
        store.select_list("b");

        assert_eq!(store.refresh(), Action::LoadLists);
        let next = store.apply(AppEvent::ListsLoaded(vec![list("a"), list("b"), list("c")]));
        assert_eq!(next, Some(Action::LoadTasks("b".to_string())));

        // "b" was deleted on the server
        let next = store.apply(AppEvent::ListsLoaded(vec![list("c")]));
        assert_eq!(next, Some(Action::LoadTasks("c".to_string())));
        assert_eq!(store.selected_list().map(|l| l.title.as_str()), Some("List c"));
    }

    #[test]
    fn filter_changes_are_local() {
        let mut store = PageStore::new(DoneFilter::Todo);
        store.apply(AppEvent::ListsLoaded(vec![list("a")]));
        store.apply(loaded("a", vec![task("1", true), task("2", false)]));
        let now = Utc.with_ymd_and_hms(2025, 5, 22, 4, 0, 0).unwrap();

        let ids: Vec<String> = store
            .rows(now, &Utc, DEFAULT_DATE_FORMAT)
            .iter()
            .map(|r| r.task.id.clone())
            .collect();
        assert_eq!(ids, vec!["2"]);

        store.set_filter(DoneFilter::Done);
        assert_eq!(store.filter(), DoneFilter::Done);
        let rows = store.rows(now, &Utc, DEFAULT_DATE_FORMAT);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task.id, "1");
        assert_eq!(rows[0].resource_path.as_deref(), Some("/lists/a/tasks/1"));

        store.set_filter(DoneFilter::Todo);
        assert_eq!(store.filter(), DoneFilter::Todo);
        assert!(store.task("1").is_some());
    }
}
