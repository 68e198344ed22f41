use crate::tui::state::{AppState, Focus};
use chrono::{Local, Utc};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(v_chunks[0]);

    // --- Sidebar ---
    let selected_id = state.store.selected();
    let list_items: Vec<ListItem> = state
        .store
        .lists()
        .iter()
        .map(|l| {
            let style = if Some(l.id.as_str()) == selected_id {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(l.title.as_str(), style)))
        })
        .collect();
    let sidebar_style = if state.active_focus == Focus::Sidebar {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let sidebar = List::new(list_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Lists ")
                .border_style(sidebar_style),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(sidebar, h_chunks[0], &mut state.sidebar_state);

    // --- Task List ---
    // Fresh clock on every frame so the countdown keeps moving.
    let rows = state.store.rows(Utc::now(), &Local, &state.date_format);
    let task_items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let due_soon = row.remaining.total_minutes().is_some_and(|m| m < 60);
            let style = if row.remaining.is_expired() && !row.task.done {
                Style::default().fg(Color::Red)
            } else if due_soon && !row.task.done {
                Style::default().fg(Color::Yellow)
            } else if row.task.done {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            let checkbox = if row.task.done { "[x]" } else { "[ ]" };
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("{} {}", checkbox, row.task.title),
                    style.add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("    Due: {}  |  {}", row.deadline, row.remaining),
                    style,
                )),
            ])
        })
        .collect();

    let main_style = if state.active_focus == Focus::Main {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let list_name = state
        .store
        .selected_list()
        .map(|l| l.title.as_str())
        .unwrap_or("-");
    let title = if state.store.is_loading() {
        format!(" {} · {} (Loading...) ", list_name, state.store.filter())
    } else {
        format!(" {} · {} ({}) ", list_name, state.store.filter(), rows.len())
    };
    let task_list = List::new(task_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(main_style),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );
    f.render_stateful_widget(task_list, h_chunks[1], &mut state.list_state);

    // --- Footer ---
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(v_chunks[1]);
    let (status_text, status_color) = match state.store.error() {
        Some(err) => (err.to_string(), Color::Red),
        None => (state.message.clone(), Color::Cyan),
    };
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );
    let help_text = "Tab:View | Enter:Open | f/t/d:Filter | r:Refresh | q:Quit";
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);

    // --- Detail Popup ---
    if let Some(task) = state.detail_task() {
        let deadline = crate::model::format_limit(task.limit, &Local, &state.date_format);
        let remaining = crate::model::Remaining::between(task.limit, Utc::now());
        let mut lines = vec![
            Line::from(Span::styled(
                task.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Due:       {}", deadline)),
            Line::from(format!("Remaining: {}", remaining)),
            Line::from(format!("Status:    {}", task.done_label())),
        ];
        if let Some(list_id) = state.store.tasks_for() {
            lines.push(Line::from(format!("Resource:  {}", task.resource_path(list_id))));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(
            task.detail
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("No description."),
        ));

        let area = centered_rect(60, 50, f.area());
        let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Task (Esc to close) ")
                .border_style(Style::default().fg(Color::Magenta)),
        );
        f.render_widget(Clear, area);
        f.render_widget(popup, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
