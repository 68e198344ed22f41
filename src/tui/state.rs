use crate::action::{Action, AppEvent};
use crate::model::{DoneFilter, Task, TaskId};
use crate::store::PageStore;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Focus {
    Sidebar,
    Main,
}

pub struct AppState {
    pub store: PageStore,
    pub list_state: ListState,
    pub sidebar_state: ListState,
    pub active_focus: Focus,
    /// Task shown in the detail popup. The popup is drawn only when set.
    pub detail: Option<TaskId>,
    pub date_format: String,
    pub message: String,
}

impl AppState {
    pub fn new(filter: DoneFilter, date_format: &str) -> Self {
        let mut l_state = ListState::default();
        l_state.select(Some(0));
        let mut s_state = ListState::default();
        s_state.select(Some(0));
        Self {
            store: PageStore::new(filter),
            list_state: l_state,
            sidebar_state: s_state,
            active_focus: Focus::Sidebar,
            detail: None,
            date_format: date_format.to_string(),
            message: "Tab: View | Enter: Open | f: Filter | r: Refresh".to_string(),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Option<Action> {
        let next = self.store.apply(event);
        self.sync_sidebar_state();
        self.clamp_task_cursor();
        let stale = self
            .detail
            .as_deref()
            .is_some_and(|id| self.store.task(id).is_none());
        if stale {
            self.detail = None;
        }
        next
    }

    /// Maps a key press in normal mode (or with the popup open) to a worker action.
    /// `Action::Quit` means the caller should leave the loop.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<Action> {
        if self.detail.is_some() {
            match code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.detail = None,
                _ => {}
            }
            return None;
        }

        match code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.jump_forward(10),
            KeyCode::PageUp => self.jump_backward(10),
            KeyCode::Char('f') => self.toggle_filter(),
            KeyCode::Char('t') => self.set_filter(DoneFilter::Todo),
            KeyCode::Char('d') => self.set_filter(DoneFilter::Done),
            KeyCode::Char('r') => {
                self.message = "Refreshing...".to_string();
                return Some(self.store.refresh());
            }
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate(),
            _ => {}
        }
        None
    }

    fn activate(&mut self) -> Option<Action> {
        match self.active_focus {
            Focus::Sidebar => {
                let idx = self.sidebar_state.selected()?;
                let id = self.store.lists().get(idx)?.id.clone();
                let action = self.store.select_list(&id);
                if action.is_some() {
                    self.list_state.select(Some(0));
                    self.active_focus = Focus::Main;
                }
                action
            }
            Focus::Main => {
                self.detail = self.selected_task().map(|t| t.id.clone());
                None
            }
        }
    }

    pub fn toggle_filter(&mut self) {
        self.set_filter(self.store.filter().toggled());
    }

    pub fn set_filter(&mut self, filter: DoneFilter) {
        self.store.set_filter(filter);
        self.list_state.select(Some(0));
        self.message = format!("Showing: {}", filter);
    }

    /// Tasks passing the active filter, in display order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.store.filter().apply(self.store.tasks()).collect()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let idx = self.list_state.selected()?;
        self.visible_tasks().get(idx).copied()
    }

    pub fn detail_task(&self) -> Option<&Task> {
        self.store.task(self.detail.as_deref()?)
    }

    fn sync_sidebar_state(&mut self) {
        let idx = self
            .store
            .selected()
            .and_then(|id| self.store.lists().iter().position(|l| l.id == id));
        self.sidebar_state.select(idx.or(Some(0)));
    }

    fn clamp_task_cursor(&mut self) {
        let len = self.visible_tasks().len();
        let sel = self.list_state.selected().unwrap_or(0);
        if len == 0 {
            self.list_state.select(Some(0));
        } else if sel >= len {
            self.list_state.select(Some(len - 1));
        }
    }

    fn focus_len(&self) -> usize {
        match self.active_focus {
            Focus::Main => self.visible_tasks().len(),
            Focus::Sidebar => self.store.lists().len(),
        }
    }

    fn focus_state(&mut self) -> &mut ListState {
        match self.active_focus {
            Focus::Main => &mut self.list_state,
            Focus::Sidebar => &mut self.sidebar_state,
        }
    }

    pub fn next(&mut self) {
        let len = self.focus_len();
        if len == 0 {
            return;
        }
        let state = self.focus_state();
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.focus_len();
        if len == 0 {
            return;
        }
        let state = self.focus_state();
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn jump_forward(&mut self, step: usize) {
        let len = self.focus_len();
        if len == 0 {
            return;
        }
        let state = self.focus_state();
        let current = state.selected().unwrap_or(0);
        // Clamp to the last item (don't wrap around like next())
        state.select(Some((current + step).min(len - 1)));
    }

    pub fn jump_backward(&mut self, step: usize) {
        if self.focus_len() == 0 {
            return;
        }
        let state = self.focus_state();
        let current = state.selected().unwrap_or(0);
        state.select(Some(current.saturating_sub(step)));
    }

    pub fn toggle_focus(&mut self) {
        self.active_focus = match self.active_focus {
            Focus::Main => Focus::Sidebar,
            Focus::Sidebar => Focus::Main,
        }
    }
}
