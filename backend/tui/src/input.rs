//! Keyboard Input Handler
//!
//! Maps crossterm key events onto `AppState`. Anything that needs I/O is
//! returned as an [`Action`] for the event loop to carry out.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Read this file and select it.
    LoadImage(PathBuf),
    /// Start an extraction for the selected image.
    Extract,
}

/// Handles a single keyboard event.
pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    // Windows reports releases too.
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return None;
    }
    if state.path_prompt.is_some() {
        return handle_prompt_key(key, state);
    }

    match key.code {
        KeyCode::Esc => state.should_quit = true,
        KeyCode::Char('o') if ctrl => {
            state.path_prompt = Some(String::new());
        }
        KeyCode::Char('e') if ctrl => return Some(Action::Extract),
        KeyCode::Char('s') if ctrl => state.submit(),
        KeyCode::Tab | KeyCode::Down => state.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.focus_prev(),
        KeyCode::Left => state.cycle_category(false),
        KeyCode::Right => state.cycle_category(true),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(c) if !ctrl => state.type_char(c),
        _ => {}
    }
    None
}

fn handle_prompt_key(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    match key.code {
        KeyCode::Esc => state.path_prompt = None,
        KeyCode::Enter => {
            let raw = state.path_prompt.take().unwrap_or_default();
            let path = raw.trim();
            if !path.is_empty() {
                return Some(Action::LoadImage(expand_home(path)));
            }
        }
        KeyCode::Backspace => {
            if let Some(buffer) = state.path_prompt.as_mut() {
                buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(buffer) = state.path_prompt.as_mut() {
                buffer.push(c);
            }
        }
        _ => {}
    }
    None
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
