use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, FocusPane, TextInput};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::FileLoaded { slot, outcome } => app.file_loaded(slot, outcome),
        AppEvent::UploadFinished { ticket, outcome } => {
            app.session.finish_upload(ticket, outcome);
            app.chat_scroll = 0;
        }
        AppEvent::AnswerFinished { ticket, outcome } => {
            app.session.finish_question(ticket, outcome);
            app.chat_scroll = 0;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // A notice blocks everything else until dismissed
    if app.session.notice().is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            app.session.dismiss_notice();
        }
        return;
    }

    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.submit_upload();
            return;
        }
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::PageUp => {
            app.scroll_chat_up();
            return;
        }
        KeyCode::PageDown => {
            app.scroll_chat_down();
            return;
        }
        _ => {}
    }

    match app.focus {
        FocusPane::ResumePath | FocusPane::JdPath => {
            let Some(slot) = app.focus.slot() else {
                return;
            };
            if key.code == KeyCode::Enter {
                app.load_file(slot);
            } else {
                edit_input(app.path_input(slot), key);
            }
        }
        FocusPane::Question => {
            if !on_submit_key(app, key) {
                edit_input(&mut app.question, key);
            }
        }
    }
}

/// Enter asks the question in the buffer; Shift+Enter or Alt+Enter inserts
/// a newline instead. Returns true if the key was consumed.
pub fn on_submit_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code != KeyCode::Enter {
        return false;
    }

    if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) {
        app.question.insert('\n');
    } else {
        app.ask_question();
    }
    true
}

fn edit_input(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        _ => {}
    }
}
