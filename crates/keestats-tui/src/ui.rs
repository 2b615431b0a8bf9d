//! UI rendering with Ratatui.

use crate::app::{App, AppState, Focus, InputMode};
use keestats_core::{ExtendedStatItem, GroupStats, StatItem, StatsError, Vault};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    match app.state {
        AppState::Locked => render_locked(frame, app),
        AppState::Unlocked => render_unlocked(frame, app),
        AppState::Quit => {}
    }
}

/// Render the password entry screen.
fn render_locked(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Center the dialog
    let dialog_area = centered_rect(50, 7, area);

    // Clear the background
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" 🔐 KeeStats - Unlock Database ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let prompt = Paragraph::new("Enter master password:").style(Style::default().fg(Color::White));
    frame.render_widget(prompt, chunks[0]);

    // Password input (masked)
    let masked: String = "*".repeat(app.password_input.chars().count());
    let input = Paragraph::new(format!("▸ {}_", masked)).style(Style::default().fg(Color::Yellow));
    frame.render_widget(input, chunks[1]);

    if let Some(ref error) = app.error_message {
        let error_msg = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(error_msg, chunks[2]);
    }
}

/// Render the group tree and the statistics pane.
fn render_unlocked(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(app.sidebar_width),
            Constraint::Percentage(100 - app.sidebar_width),
        ])
        .split(area);

    render_sidebar(frame, app, chunks[0]);
    render_stats(frame, app, chunks[1]);

    if app.input_mode == InputMode::EntryPopup {
        render_entry_popup(frame, app, area);
    }
}

fn border_color(focused: bool) -> Color {
    if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}

/// Render the sidebar group tree.
fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" 📁 Groups ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app.focus == Focus::Sidebar)));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items: Vec<ListItem> = app
        .tree_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let indent = "  ".repeat(item.depth);
            let arrow = if item.is_expanded && item.has_children {
                "▾"
            } else if item.has_children {
                "▸"
            } else {
                " "
            };
            let icon = if item.is_recycle_bin { "🗑" } else { "📁" };
            let content = format!("{}{} {} {}", indent, arrow, icon, item.name);

            let style = if i == app.sidebar_selected_index {
                Style::default()
                    .bg(Color::Rgb(60, 60, 80))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Yellow)
            };

            ListItem::new(Line::from(content)).style(style)
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

/// Render the statistics for the selected group.
fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let scope = if app.recursive { "recursive" } else { "this group only" };
    let block = Block::default()
        .title(format!(" 📊 Statistics ({}) ", scope))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(app.focus == Focus::Stats)));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Group path
            Constraint::Min(3),    // Stats
            Constraint::Length(1), // Help line
        ])
        .split(inner);

    let path = match (app.vault.as_ref(), app.selected_group()) {
        (Some(vault), Some(id)) => vault.group(id).map(|g| g.path()).unwrap_or_default(),
        _ => String::new(),
    };
    frame.render_widget(
        Paragraph::new(path).style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    match (&app.stats, app.vault.as_ref()) {
        (Some(Ok(stats)), Some(vault)) => render_stat_lines(frame, app, stats, vault, chunks[1]),
        (Some(Err(StatsError::NoData)), _) => {
            let message = Paragraph::new(StatsError::NoData.to_string())
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(message, centered_rect(40, 1, chunks[1]));
        }
        _ => {}
    }

    let help = Paragraph::new("Tab: focus stats | Enter: show entry | r: toggle scope | q: quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

fn render_stat_lines(frame: &mut Frame, app: &App, stats: &GroupStats, vault: &Vault, area: Rect) {
    let mut items: Vec<ListItem> = stats
        .simple
        .iter()
        .map(|item| ListItem::new(stat_line(item.label(), format_simple(item), None)))
        .collect();

    items.push(ListItem::new(Line::from("")));

    for (i, item) in stats.extended.iter().enumerate() {
        let title = item
            .entry
            .and_then(|id| vault.entry(id))
            .map(|entry| entry.title().to_string());
        let line = stat_line(item.label(), format_extended(item), title);
        let selected = app.focus == Focus::Stats && i == app.stats_selected_index;
        let style = if selected {
            Style::default()
                .bg(Color::Rgb(60, 60, 80))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        items.push(ListItem::new(line).style(style));
    }

    frame.render_widget(List::new(items), area);
}

fn stat_line(label: &str, value: String, entry_title: Option<String>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("{:<32}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::Green)),
    ];
    if let Some(title) = entry_title {
        spans.push(Span::styled(
            format!("  🔑 {}", title),
            Style::default().fg(Color::Cyan),
        ));
    }
    Line::from(spans)
}

/// Format a simple statistic for display.
pub fn format_simple(item: &StatItem) -> String {
    if item.kind.is_percent() {
        format!("{:.1}%", item.value)
    } else {
        format!("{:.0}", item.value)
    }
}

/// Format an extended statistic; unmeasured trackers show as `n/a`.
pub fn format_extended(item: &ExtendedStatItem) -> String {
    if item.is_measured() {
        format!("{:.0} chars", item.value)
    } else {
        "n/a".to_string()
    }
}

/// Render the entry referenced by the selected statistic.
fn render_entry_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some((entry, path)) = app.popup_details() else {
        return;
    };

    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, 9, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" 📋 Entry Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let masked = "•".repeat(entry.password().chars().count());
    let lines = vec![
        field_line("Title", entry.title(), Color::White),
        field_line("Username", entry.username(), Color::Green),
        field_line("Password", &masked, Color::Yellow),
        field_line("URL", entry.url(), Color::Blue),
        field_line("Group", &path, Color::White),
        Line::from(""),
        Line::from(Span::styled("Esc: close", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line(label: &str, value: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value.to_string(), Style::default().fg(color)),
    ])
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
