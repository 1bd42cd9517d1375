//! Frame layout.
//!
//! ```text
//! +-------------+---------------------------+
//! | Collections | Request Editor            |
//! |             +---------------------------+
//! +-------------+ Response                  |
//! | Requests    |                           |
//! |             +---------------------------+
//! |             | Environment               |
//! +-------------+---------------------------+
//! status line                        key help
//! ```

use postbox_application::{Focus, HttpClient, ListKind, Selection, WorkspaceStore};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, Paragraph, Wrap};

use crate::app::App;
use crate::bridge::Tone;
use crate::keymap::hint;

/// Draws the whole shell.
pub fn draw<S, C>(frame: &mut Frame<'_>, app: &mut App<S, C>)
where
    S: WorkspaceStore,
    C: HttpClient + 'static,
{
    let [main, status] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(25), Constraint::Percentage(75)]).areas(main);
    let [collections, requests] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(left);
    let [editor, viewer, environment] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(40),
        Constraint::Percentage(20),
    ])
    .areas(right);

    let focus = app.workspace().focus();
    draw_list(frame, app, ListKind::Collections, collections);
    draw_list(frame, app, ListKind::Requests, requests);

    let title = editor_title(app.workspace().selection());
    app.editor.set_block(panel(title, focus == Focus::Editor));
    app.editor.set_cursor_line_style(Style::default());
    frame.render_widget(&app.editor, editor);

    let viewer_title = Line::styled(app.viewer.title.clone(), tone_style(app.viewer.tone));
    let viewer_block = panel(viewer_title, focus == Focus::Viewer);
    let body = Paragraph::new(app.viewer.body.as_str())
        .block(viewer_block)
        .wrap(Wrap { trim: false })
        .scroll((app.viewer_scroll, 0));
    frame.render_widget(body, viewer);

    app.environment_editor
        .set_block(panel(Focus::Environment.label().to_string(), focus == Focus::Environment));
    app.environment_editor.set_cursor_line_style(Style::default());
    frame.render_widget(&app.environment_editor, environment);

    draw_status(frame, app, focus, status);
}

fn draw_list<S, C>(frame: &mut Frame<'_>, app: &mut App<S, C>, kind: ListKind, area: Rect)
where
    S: WorkspaceStore,
    C: HttpClient + 'static,
{
    let workspace = app.workspace();
    let (focus, title) = match kind {
        ListKind::Collections => (Focus::Collections, Focus::Collections.label().to_string()),
        ListKind::Requests => (
            Focus::Requests,
            workspace
                .selection()
                .collection_name()
                .map_or_else(|| Focus::Requests.label().to_string(), |c| format!("Requests: {c}")),
        ),
    };
    let active = match kind {
        ListKind::Collections => workspace.selection().collection_name(),
        ListKind::Requests => workspace.selection().request_name(),
    }
    .map(str::to_string);
    let focused = workspace.focus() == focus;

    let items: Vec<Line<'_>> = workspace
        .display_list(kind)
        .into_iter()
        .map(|name| {
            if active.as_deref() == Some(name.as_str()) {
                Line::from(Span::styled(name, Style::new().add_modifier(Modifier::BOLD)))
            } else {
                Line::from(name)
            }
        })
        .collect();

    let highlight = if focused {
        Style::new().add_modifier(Modifier::REVERSED)
    } else {
        Style::new()
    };
    let list = List::new(items)
        .block(panel(title, focused))
        .highlight_style(highlight)
        .highlight_symbol("> ");

    let state = match kind {
        ListKind::Collections => &mut app.collections_state,
        ListKind::Requests => &mut app.requests_state,
    };
    frame.render_stateful_widget(list, area, state);
}

fn draw_status<S, C>(frame: &mut Frame<'_>, app: &App<S, C>, focus: Focus, area: Rect)
where
    S: WorkspaceStore,
    C: HttpClient + 'static,
{
    let help = hint(focus);
    let [message, keys] = Layout::horizontal([
        Constraint::Min(10),
        Constraint::Length(u16::try_from(help.len()).unwrap_or(u16::MAX)),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(app.status()), message);
    frame.render_widget(
        Paragraph::new(Span::styled(help, Style::new().fg(Color::DarkGray))),
        keys,
    );
}

fn editor_title(selection: &Selection) -> String {
    let mode = match selection {
        Selection::None => "new collection",
        Selection::Collection { .. } => "rename collection or new request",
        Selection::Request { .. } => "edit request",
    };
    format!("{}: {mode}", Focus::Editor.label())
}

const fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Neutral => Style::new(),
        Tone::Success => Style::new().fg(Color::Green),
        Tone::Failure => Style::new().fg(Color::Red),
    }
}

fn panel(title: impl Into<Line<'static>>, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::new()
    };
    Block::bordered().title(title).border_style(style)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn editor_title_follows_selection() {
        assert_eq!(editor_title(&Selection::None), "Request Editor: new collection");
        assert_eq!(
            editor_title(&Selection::request("Demo", "Ping")),
            "Request Editor: edit request"
        );
    }

    #[test]
    fn viewer_title_color_follows_tone() {
        assert_eq!(tone_style(Tone::Success).fg, Some(Color::Green));
        assert_eq!(tone_style(Tone::Failure).fg, Some(Color::Red));
        assert_eq!(tone_style(Tone::Neutral), Style::new());
    }
}
