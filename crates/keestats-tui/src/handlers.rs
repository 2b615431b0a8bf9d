//! Keyboard event handling.

use crate::app::{App, AppState, Focus, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::PasswordEntry => handle_password_key(app, key),
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::EntryPopup => handle_popup_key(app, key),
    }
}

fn handle_password_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => {
            app.try_unlock();
            false
        }
        KeyCode::Char(c) => {
            app.password_input.push(c);
            false
        }
        KeyCode::Backspace => {
            app.password_input.pop();
            false
        }
        KeyCode::Esc => {
            app.state = AppState::Quit;
            true
        }
        _ => false,
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C to quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state = AppState::Quit;
        return true;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quit;
            true
        }
        KeyCode::Char('r') => {
            app.toggle_recursive();
            false
        }
        KeyCode::Tab => {
            match app.focus {
                Focus::Sidebar => app.focus_stats(),
                Focus::Stats => app.focus = Focus::Sidebar,
            }
            false
        }
        KeyCode::Esc => {
            app.focus = Focus::Sidebar;
            false
        }
        _ => {
            match app.focus {
                Focus::Sidebar => handle_sidebar_key(app, key.code),
                Focus::Stats => handle_stats_key(app, key.code),
            }
            false
        }
    }
}

fn handle_sidebar_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_current(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => app.expand_current(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.move_stat_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_stat_up(),
        KeyCode::Enter => app.open_selected_entry(),
        _ => {}
    }
}

fn handle_popup_key(app: &mut App, key: KeyEvent) -> bool {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
        app.close_popup();
    }
    false
}
