//! Shell state and action dispatch.
//!
//! `App` owns the workspace and everything the terminal shows. Key presses
//! and worker results are applied one at a time by the event loop, so no
//! locking is needed; only the HTTP call runs elsewhere, on a tokio task
//! that reports back through a channel.

use crossterm::event::{KeyEvent, KeyEventKind};
use postbox_application::{
    CancellationToken, CommitOutcome, DeleteOutcome, FireRequest, Focus, HttpClient, ListKind,
    Workspace, WorkspaceStore, prepare_call,
};
use ratatui::widgets::ListState;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tui_textarea::{Input, TextArea};

use crate::bridge::{UiUpdate, ViewerContent};
use crate::keymap::{Action, action_for};

const PAGE: u16 = 10;

/// The terminal shell's state.
pub struct App<S, C: HttpClient> {
    workspace: Workspace<S>,
    fire_request: FireRequest<C>,
    updates: mpsc::UnboundedSender<UiUpdate>,
    pub(crate) editor: TextArea<'static>,
    pub(crate) environment_editor: TextArea<'static>,
    pub(crate) viewer: ViewerContent,
    pub(crate) viewer_scroll: u16,
    pub(crate) collections_state: ListState,
    pub(crate) requests_state: ListState,
    pub(crate) status: String,
    generation: u64,
    in_flight: Option<CancellationToken>,
    should_quit: bool,
}

impl<S, C> App<S, C>
where
    S: WorkspaceStore,
    C: HttpClient + 'static,
{
    /// Creates the shell and the channel background tasks report on.
    pub fn new(
        workspace: Workspace<S>,
        fire_request: FireRequest<C>,
    ) -> (Self, mpsc::UnboundedReceiver<UiUpdate>) {
        let (updates, receiver) = mpsc::unbounded_channel();
        let environment_editor = text_area(&workspace.environment_text());
        let mut app = Self {
            workspace,
            fire_request,
            updates,
            editor: text_area(""),
            environment_editor,
            viewer: ViewerContent::default(),
            viewer_scroll: 0,
            collections_state: ListState::default(),
            requests_state: ListState::default(),
            status: "Ready".to_string(),
            generation: 0,
            in_flight: None,
            should_quit: false,
        };
        app.sync_lists();
        (app, receiver)
    }

    /// The workspace being edited.
    pub const fn workspace(&self) -> &Workspace<S> {
        &self.workspace
    }

    /// The request editor's text.
    pub fn editor_text(&self) -> String {
        text_of(&self.editor)
    }

    /// The environment editor's text.
    pub fn environment_editor_text(&self) -> String {
        text_of(&self.environment_editor)
    }

    /// What the response viewer shows.
    pub const fn viewer(&self) -> &ViewerContent {
        &self.viewer
    }

    /// The status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns true once the user asked to quit.
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Replaces the request editor's text.
    pub fn set_editor_text(&mut self, text: &str) {
        self.editor = text_area(text);
    }

    /// Handles one key press.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(action) = action_for(self.workspace.focus(), key) {
            self.apply(action).await;
        }
    }

    /// Applies one action.
    pub async fn apply(&mut self, action: Action) {
        match action {
            Action::Focus(focus) => self.workspace.set_focus(focus),
            Action::Create => {
                if let Some(seed) = self.workspace.activate_create() {
                    self.set_editor_text(&seed);
                    self.status = "New entry: one line for a collection, five for a request".into();
                    self.sync_lists();
                }
            }
            Action::Edit => {
                if let Some(seed) = self.workspace.activate_edit() {
                    self.set_editor_text(&seed);
                }
            }
            Action::Delete => self.delete().await,
            Action::Commit => self.commit().await,
            Action::Fire => self.fire(),
            Action::Quit => {
                self.cancel_in_flight();
                self.should_quit = true;
            }
            Action::Up => self.step(false),
            Action::Down => self.step(true),
            Action::PageUp => self.scroll_viewer(false, PAGE),
            Action::PageDown => self.scroll_viewer(true, PAGE),
            Action::Activate => self.activate(),
            Action::Leave => {
                let focus = self.workspace.list_focus();
                self.workspace.set_focus(focus);
            }
            Action::Text(key) => {
                let target = if self.workspace.focus() == Focus::Environment {
                    &mut self.environment_editor
                } else {
                    &mut self.editor
                };
                target.input(Input::from(key));
            }
        }
    }

    /// Applies a message from a background task.
    pub fn handle_update(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::Response { generation, result } => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "stale response dropped");
                    return;
                }
                self.in_flight = None;
                match ViewerContent::from_result(&result) {
                    Some(content) => {
                        info!(title = %content.title, "response shown");
                        self.viewer = content;
                        self.viewer_scroll = 0;
                    }
                    None => debug!(generation, "cancelled response dropped"),
                }
            }
        }
    }

    async fn commit(&mut self) {
        let environment = self.workspace.focus() == Focus::Environment;
        let buffer = if environment {
            text_of(&self.environment_editor)
        } else {
            text_of(&self.editor)
        };

        let report = self.workspace.commit(&buffer).await;
        if environment && !report.outcome.is_rejected() {
            self.environment_editor = text_area(&self.workspace.environment_text());
        }
        self.status = describe_commit(&report.outcome);
        self.report_persist(report.persist_error);
        self.sync_lists();
    }

    async fn delete(&mut self) {
        let report = self.workspace.activate_delete().await;
        self.status = match &report.outcome {
            DeleteOutcome::CollectionDeleted { collection } => {
                format!("Deleted collection '{collection}'")
            }
            DeleteOutcome::RequestDeleted { collection, request } => {
                format!("Deleted request '{request}' from '{collection}'")
            }
            DeleteOutcome::Rejected(reason) => format!("Nothing deleted: {reason}"),
        };
        self.report_persist(report.persist_error);
        self.sync_lists();
    }

    fn fire(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        self.viewer_scroll = 0;

        let call = match prepare_call(&text_of(&self.editor), self.workspace.environment()) {
            Ok(call) => call,
            Err(e) => {
                warn!(error = %e, "request not fired");
                self.viewer = ViewerContent::error(&e);
                return;
            }
        };

        let generation = self.generation;
        let (token, receiver) = CancellationToken::new();
        self.in_flight = Some(token);
        self.viewer =
            ViewerContent::pending(&call.method, &call.url, self.fire_request.timeout());

        let fire_request = self.fire_request.clone();
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let result = fire_request.execute_with_cancellation(&call, receiver).await;
            let _ = updates.send(UiUpdate::Response { generation, result });
        });
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            debug!(generation = self.generation, "cancelling in-flight request");
            token.cancel();
        }
    }

    fn activate(&mut self) {
        match self.workspace.focus() {
            Focus::Collections => {
                let names = self.workspace.display_list(ListKind::Collections);
                if let Some(name) = self.collections_state.selected().and_then(|i| names.get(i)) {
                    self.workspace.select_collection(name);
                    self.sync_lists();
                }
            }
            Focus::Requests => {
                let names = self.workspace.display_list(ListKind::Requests);
                if let Some(name) = self.requests_state.selected().and_then(|i| names.get(i))
                    && let Some(seed) = self.workspace.select_request(name)
                {
                    self.set_editor_text(&seed);
                    self.sync_lists();
                }
            }
            _ => {}
        }
    }

    fn step(&mut self, down: bool) {
        let (state, list) = match self.workspace.focus() {
            Focus::Collections => (&mut self.collections_state, ListKind::Collections),
            Focus::Requests => (&mut self.requests_state, ListKind::Requests),
            Focus::Viewer => {
                self.scroll_viewer(down, 1);
                return;
            }
            _ => return,
        };
        let len = self.workspace.display_list(list).len();
        if len == 0 {
            state.select(None);
            return;
        }
        let next = match (state.selected(), down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        state.select(Some(next));
    }

    fn scroll_viewer(&mut self, down: bool, lines: u16) {
        let last_line = self.viewer.body.lines().count().saturating_sub(1);
        let max = u16::try_from(last_line).unwrap_or(u16::MAX);
        self.viewer_scroll = if down {
            self.viewer_scroll.saturating_add(lines).min(max)
        } else {
            self.viewer_scroll.saturating_sub(lines)
        };
    }

    /// Points both list highlights at the active entities.
    fn sync_lists(&mut self) {
        let collections = self.workspace.display_list(ListKind::Collections);
        let selection = self.workspace.selection();
        let active = selection
            .collection_name()
            .and_then(|name| collections.iter().position(|c| c == name));
        self.collections_state
            .select(active.or_else(|| (!collections.is_empty()).then_some(0)));

        let requests = self.workspace.display_list(ListKind::Requests);
        let active = selection
            .request_name()
            .and_then(|name| requests.iter().position(|r| r == name));
        self.requests_state
            .select(active.or_else(|| (!requests.is_empty()).then_some(0)));
    }

    fn report_persist(&mut self, persist_error: Option<String>) {
        if let Some(error) = persist_error {
            self.status = format!("{} (not saved: {error})", self.status);
        }
    }
}

fn describe_commit(outcome: &CommitOutcome) -> String {
    match outcome {
        CommitOutcome::CollectionCreated { collection } => {
            format!("Created collection '{collection}'")
        }
        CommitOutcome::CollectionRenamed { from, to } if from == to => {
            format!("Saved collection '{to}'")
        }
        CommitOutcome::CollectionRenamed { from, to } => {
            format!("Renamed collection '{from}' to '{to}'")
        }
        CommitOutcome::RequestCreated { collection, request } => {
            format!("Created request '{request}' in '{collection}'")
        }
        CommitOutcome::RequestUpdated { collection, request } => {
            format!("Saved request '{request}' in '{collection}'")
        }
        CommitOutcome::EnvironmentReplaced { variables } => {
            format!("Saved environment ({variables} variables)")
        }
        CommitOutcome::Rejected(reason) => format!("Not saved: {reason}"),
    }
}

/// Builds an editor holding `text`, keeping empty trailing lines.
fn text_area(text: &str) -> TextArea<'static> {
    TextArea::new(text.split('\n').map(str::to_string).collect())
}

fn text_of(area: &TextArea<'_>) -> String {
    area.lines().join("\n")
}
