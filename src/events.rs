use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Dispatches one key press against the active view. Returns `true` when the
/// application should quit.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl+C quits from anywhere.
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.mode {
        Mode::Idle => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('s') | KeyCode::Enter => app.open_form(),
            _ => {}
        },
        Mode::Collecting => match key.code {
            KeyCode::Esc => app.cancel_form(),
            KeyCode::Enter => app.submit_form(),
            KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.form.focus_previous(),
            _ => app.form.input(key),
        },
        // Loading is modal: the request runs to settlement, no interaction.
        Mode::Loading => {}
        Mode::Results => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.close_results(),
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => app.scroll_results_up(1),
            KeyCode::Down => app.scroll_results_down(1),
            KeyCode::PageUp => app.scroll_results_up(5),
            KeyCode::PageDown => app.scroll_results_down(5),
            _ => {}
        },
    }

    Ok(false)
}
