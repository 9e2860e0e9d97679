use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::picker::Picker;

/// Handle a key event inside the picker.
pub fn handle_key_event(picker: &mut Picker, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => picker.dismiss(),
        KeyCode::Char('c') if ctrl => picker.dismiss(),
        KeyCode::Enter => picker.accept(),
        KeyCode::Up => picker.select_previous(),
        KeyCode::Char('p' | 'k') if ctrl => picker.select_previous(),
        KeyCode::Down | KeyCode::Tab => picker.select_next(),
        KeyCode::Char('n' | 'j') if ctrl => picker.select_next(),
        KeyCode::Left => picker.move_cursor_left(),
        KeyCode::Right => picker.move_cursor_right(),
        KeyCode::Home => picker.cursor_home(),
        KeyCode::Char('a') if ctrl => picker.cursor_home(),
        KeyCode::End => picker.cursor_end(),
        KeyCode::Char('e') if ctrl => picker.cursor_end(),
        KeyCode::Backspace => picker.delete_char(),
        KeyCode::Char(c) if !ctrl => picker.input_char(c),
        _ => {}
    }
}
