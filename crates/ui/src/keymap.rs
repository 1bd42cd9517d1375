//! Keyboard surface.
//!
//! List and viewer panels use single letters. The two text panels pass
//! ordinary keys to the editor, so their shortcuts need a modifier.
//!
//! | Key                  | List / viewer panels   | Text panels         |
//! |----------------------|------------------------|---------------------|
//! | `c` `r` `e` `v` `n`  | focus a panel          | typed               |
//! | `a` / `u` / `d`      | create / edit / delete | typed               |
//! | `p`, `Ctrl-p`        | fire request           | `Ctrl-p` only       |
//! | `q`, `Ctrl-q`        | quit                   | `Ctrl-q` only       |
//! | `Esc`                |                        | commit              |
//! | `Tab`                |                        | leave without commit|
//! | `Enter`              | activate list item     | newline             |
//! | arrows, `j` `k`      | move / scroll          | cursor              |

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use postbox_application::Focus;

/// What a key press asks the shell to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move focus to a panel.
    Focus(Focus),
    /// Prepare the editor for a new entity.
    Create,
    /// Load the active entity into the editor.
    Edit,
    /// Remove the active entity of the focused list.
    Delete,
    /// Apply the focused text panel.
    Commit,
    /// Send the request in the editor.
    Fire,
    /// End the program.
    Quit,
    /// Move the list highlight up.
    Up,
    /// Move the list highlight down.
    Down,
    /// Scroll the viewer by a page.
    PageUp,
    /// Scroll the viewer by a page.
    PageDown,
    /// Make the highlighted list item active.
    Activate,
    /// Leave a text panel without committing.
    Leave,
    /// Forward the key to the focused text panel.
    Text(KeyEvent),
}

/// Maps a key press to an action for the focused panel.
#[must_use]
pub fn action_for(focus: Focus, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q' | 'c') => return Some(Action::Quit),
            KeyCode::Char('p') => return Some(Action::Fire),
            _ => {}
        }
    }

    if focus.is_text_input() {
        return Some(match key.code {
            KeyCode::Esc => Action::Commit,
            KeyCode::Tab => Action::Leave,
            _ => Action::Text(key),
        });
    }

    let action = match key.code {
        KeyCode::Char('c') => Action::Focus(Focus::Collections),
        KeyCode::Char('r') => Action::Focus(Focus::Requests),
        KeyCode::Char('e') => Action::Focus(Focus::Editor),
        KeyCode::Char('v') => Action::Focus(Focus::Viewer),
        KeyCode::Char('n') => Action::Focus(Focus::Environment),
        KeyCode::Char('a') => Action::Create,
        KeyCode::Char('u') => Action::Edit,
        KeyCode::Char('d') => Action::Delete,
        KeyCode::Char('p') => Action::Fire,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Enter => Action::Activate,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        _ => return None,
    };
    Some(action)
}

/// One-line key help for the status bar.
#[must_use]
pub const fn hint(focus: Focus) -> &'static str {
    match focus {
        Focus::Collections | Focus::Requests => {
            "enter select  a new  u edit  d delete  p fire  c/r/e/v/n focus  q quit"
        }
        Focus::Viewer => "up/down scroll  p fire  c/r/e/n focus  q quit",
        Focus::Editor | Focus::Environment => "esc commit  tab leave  ctrl-p fire  ctrl-q quit",
    }
}
