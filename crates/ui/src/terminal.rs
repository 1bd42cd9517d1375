//! Terminal setup and the event loop.

use std::io::{self, Stdout};

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use postbox_application::{HttpClient, WorkspaceStore};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::App;
use crate::bridge::{InputEvent, UiUpdate};
use crate::rendering;

/// Raw-mode alternate screen, restored on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Switches the terminal into raw mode on the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn init() -> io::Result<Self> {
        enable_raw_mode()?;
        let terminal = or_undo(
            || {
                let mut stdout = io::stdout();
                stdout.execute(EnterAlternateScreen)?;
                Terminal::new(CrosstermBackend::new(stdout))
            },
            restore_terminal,
        )?;
        Ok(Self { terminal })
    }
}

/// Runs `setup`, calling `undo` when it fails.
fn or_undo<T>(setup: impl FnOnce() -> io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    setup().inspect_err(|_| undo())
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
}

impl Drop for Tui {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

/// Runs the shell until the user quits.
///
/// Key presses are read on a dedicated thread and forwarded over a channel,
/// so the loop can wait on keys and fire-request results together.
///
/// # Errors
///
/// Returns an error if the terminal cannot be initialized or drawn.
pub async fn run<S, C>(
    mut app: App<S, C>,
    mut updates: mpsc::UnboundedReceiver<UiUpdate>,
) -> io::Result<()>
where
    S: WorkspaceStore,
    C: HttpClient + 'static,
{
    let mut tui = Tui::init()?;
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    spawn_input_reader(input_tx);
    info!("terminal shell started");

    while !app.should_quit() {
        tui.terminal.draw(|frame| rendering::draw(frame, &mut app))?;

        tokio::select! {
            input = input_rx.recv() => match input {
                Some(InputEvent::Key(key)) => app.handle_key(key).await,
                Some(InputEvent::Resize) => {}
                None => break,
            },
            Some(update) = updates.recv() => app.handle_update(update),
        }
    }

    info!("terminal shell stopped");
    Ok(())
}

fn spawn_input_reader(sender: mpsc::UnboundedSender<InputEvent>) {
    std::thread::spawn(move || {
        loop {
            let input = match event::read() {
                Ok(Event::Key(key)) => InputEvent::Key(key),
                Ok(Event::Resize(..)) => InputEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            };
            if sender.send(input).is_err() {
                break;
            }
        }
    });
}
