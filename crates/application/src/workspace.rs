//! The workspace state machine.
//!
//! A `Workspace` owns the collections, the environment, the active
//! selection and the focused panel. The event loop owns the workspace and
//! feeds it one action at a time. The only transitions that change the
//! model are [`Workspace::commit`] and [`Workspace::activate_delete`]; both
//! write the affected document before returning.
//!
//! Commit dispatch:
//!
//! | focus / selection         | buffer     | effect                         |
//! |---------------------------|------------|--------------------------------|
//! | environment editor        | any        | replace environment            |
//! | nothing active            | 1 segment  | create collection              |
//! | collection active         | 1 segment  | rename collection              |
//! | collection active         | 5 segments | create request                 |
//! | collection + request      | 5 segments | overwrite request in place     |
//!
//! Every other combination is rejected and leaves the model untouched.

use postbox_domain::edit_buffer::{Decoded, RequestPayload, decode};
use postbox_domain::{Collection, DomainError, Environment, Request};
use tracing::{debug, error, info, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::navigation::{EditorAction, Focus, ListKind, Selection, display_list, editor_seed};
use crate::ports::{Document, WorkspaceStore};

/// What a commit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A collection was appended and made active.
    CollectionCreated {
        /// New collection name.
        collection: String,
    },
    /// The active collection was renamed.
    CollectionRenamed {
        /// Previous name.
        from: String,
        /// New name.
        to: String,
    },
    /// A request was appended to the active collection and made active.
    RequestCreated {
        /// Owning collection.
        collection: String,
        /// New request name.
        request: String,
    },
    /// The active request was overwritten.
    RequestUpdated {
        /// Owning collection.
        collection: String,
        /// Request name after the update.
        request: String,
    },
    /// The environment was replaced wholesale.
    EnvironmentReplaced {
        /// Number of variables parsed from the buffer.
        variables: usize,
    },
    /// Nothing changed.
    Rejected(ApplicationError),
}

impl CommitOutcome {
    /// Returns true if the commit changed nothing.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// What a delete did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The active collection and all its requests were removed.
    CollectionDeleted {
        /// Removed collection name.
        collection: String,
    },
    /// The active request was removed.
    RequestDeleted {
        /// Owning collection.
        collection: String,
        /// Removed request name.
        request: String,
    },
    /// Nothing changed.
    Rejected(ApplicationError),
}

/// Outcome of a mutating action plus the result of the write that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport<T> {
    /// What happened to the model.
    pub outcome: T,
    /// Set when the model changed but the document could not be written.
    pub persist_error: Option<String>,
}

impl<T> MutationReport<T> {
    const fn unchanged(outcome: T) -> Self {
        Self {
            outcome,
            persist_error: None,
        }
    }
}

/// Collections, environment, selection and focus, plus the store they persist to.
#[derive(Debug)]
pub struct Workspace<S> {
    store: S,
    collections: Vec<Collection>,
    environment: Environment,
    selection: Selection,
    focus: Focus,
}

impl<S: WorkspaceStore> Workspace<S> {
    /// Creates a workspace over already loaded documents.
    pub fn new(store: S, collections: Vec<Collection>, environment: Environment) -> Self {
        Self {
            store,
            collections,
            environment,
            selection: Selection::None,
            focus: Focus::Collections,
        }
    }

    /// Loads both documents from the store.
    ///
    /// A document that cannot be read is logged and replaced by an empty set.
    pub async fn load(store: S) -> Self {
        let collections = match store.load_collections().await {
            Ok(collections) => {
                info!(count = collections.len(), "loaded collections");
                collections
            }
            Err(e) => {
                warn!(error = %e, "could not load collections, starting empty");
                Vec::new()
            }
        };
        let environment = match store.load_environment().await {
            Ok(environment) => {
                info!(count = environment.len(), "loaded environment");
                environment
            }
            Err(e) => {
                warn!(error = %e, "could not load environment, starting empty");
                Environment::new()
            }
        };
        Self::new(store, collections, environment)
    }

    /// All collections in display order.
    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// The current environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The environment rendered as `KEY=VALUE` lines.
    #[must_use]
    pub fn environment_text(&self) -> String {
        self.environment.render()
    }

    /// The active selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The focused panel.
    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    /// Moves focus without touching the selection.
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Names to render in one of the lists.
    #[must_use]
    pub fn display_list(&self, list: ListKind) -> Vec<String> {
        display_list(&self.collections, &self.selection, list)
    }

    /// The active collection, if any.
    #[must_use]
    pub fn active_collection(&self) -> Option<&Collection> {
        let name = self.selection.collection_name()?;
        self.collections.iter().find(|c| c.name == name)
    }

    /// The active request, if any.
    #[must_use]
    pub fn active_request(&self) -> Option<&Request> {
        self.active_collection()?
            .request(self.selection.request_name()?)
    }

    /// Makes a collection active and moves focus to its request list.
    ///
    /// Returns false if no collection has that name.
    pub fn select_collection(&mut self, name: &str) -> bool {
        if !self.collections.iter().any(|c| c.name == name) {
            return false;
        }
        debug!(collection = name, "collection selected");
        self.selection = Selection::collection(name);
        self.focus = Focus::Requests;
        true
    }

    /// Makes a request of the active collection active.
    ///
    /// Returns its encoding for the edit buffer, or `None` if there is no
    /// such request.
    pub fn select_request(&mut self, name: &str) -> Option<String> {
        let collection = self.selection.collection_name()?.to_string();
        let seed = editor_seed(
            &self.collections,
            &Selection::request(collection.clone(), name),
            EditorAction::UpdateExisting,
        )?;
        debug!(collection = %collection, request = name, "request selected");
        self.selection = Selection::request(collection, name);
        Some(seed)
    }

    /// Prepares the editor for a new entity.
    ///
    /// From the collection list this clears the selection, so the next
    /// commit creates a collection. From the request list it drops the
    /// active request, so the next commit creates a request in the active
    /// collection. Returns the (empty) seed, or `None` if nothing applies.
    pub fn activate_create(&mut self) -> Option<String> {
        match self.focus {
            Focus::Collections => self.selection = Selection::None,
            Focus::Requests => {
                let collection = self.selection.collection_name()?.to_string();
                self.selection = Selection::collection(collection);
            }
            _ => return None,
        }
        self.focus = Focus::Editor;
        editor_seed(&self.collections, &self.selection, EditorAction::Create)
    }

    /// Prepares the editor with the active entity.
    ///
    /// The collection list seeds the bare name (rename); the request list
    /// seeds the full request encoding. With nothing active the seed is
    /// empty, which makes the next commit a create.
    pub fn activate_edit(&mut self) -> Option<String> {
        let action = match self.focus {
            Focus::Collections if self.selection.collection_name().is_some() => {
                EditorAction::Rename
            }
            Focus::Collections => EditorAction::Create,
            Focus::Requests if self.selection.request_name().is_some() => {
                EditorAction::UpdateExisting
            }
            Focus::Requests if self.selection.collection_name().is_some() => EditorAction::Create,
            _ => return None,
        };
        let seed = editor_seed(&self.collections, &self.selection, action)?;
        self.focus = Focus::Editor;
        Some(seed)
    }

    /// Removes the active entity of the focused list and persists.
    ///
    /// The selection moves one level up and focus stays on the list.
    pub async fn activate_delete(&mut self) -> MutationReport<DeleteOutcome> {
        let outcome = match (self.focus, self.selection.clone()) {
            (
                Focus::Collections,
                Selection::Collection { collection } | Selection::Request { collection, .. },
            ) => self.delete_collection(&collection),
            (Focus::Requests, Selection::Request { collection, request }) => {
                self.delete_request(&collection, &request)
            }
            _ => Err(ApplicationError::NothingSelected),
        };

        match outcome {
            Ok(outcome) => {
                info!(?outcome, "deleted");
                let persist_error = self.persist(Document::Collections).await;
                MutationReport {
                    outcome,
                    persist_error,
                }
            }
            Err(e) => {
                debug!(reason = %e, "delete ignored");
                MutationReport::unchanged(DeleteOutcome::Rejected(e))
            }
        }
    }

    /// Applies the edit buffer according to focus and selection.
    ///
    /// With the environment editor focused the buffer replaces the
    /// environment. Otherwise the buffer is decoded by segment count and
    /// dispatched on the selection. A successful commit writes the owning
    /// document once and returns focus to the list panels; a rejected one
    /// changes nothing and leaves focus where it was.
    pub async fn commit(&mut self, buffer: &str) -> MutationReport<CommitOutcome> {
        if self.focus == Focus::Environment {
            return self.commit_environment(buffer).await;
        }

        let decoded = decode(buffer);
        let segments = decoded.segments();
        let result = match (self.selection.clone(), decoded) {
            (Selection::None, Decoded::Name(name)) => self.create_collection(name),
            (Selection::Collection { collection }, Decoded::Name(name)) => {
                self.rename_collection(&collection, name)
            }
            (Selection::Collection { collection }, Decoded::Request(payload)) => {
                self.create_request(&collection, payload)
            }
            (Selection::Request { collection, request }, Decoded::Request(payload)) => {
                self.update_request(&collection, &request, payload)
            }
            (selection, _) => Err(ApplicationError::MalformedBuffer {
                segments,
                expected: expected_shape(&selection),
            }),
        };

        match result {
            Ok(outcome) => {
                info!(?outcome, "commit applied");
                let persist_error = self.persist(Document::Collections).await;
                self.focus = self.list_focus();
                MutationReport {
                    outcome,
                    persist_error,
                }
            }
            Err(e) => {
                info!(reason = %e, segments, "commit rejected");
                MutationReport::unchanged(CommitOutcome::Rejected(e))
            }
        }
    }

    async fn commit_environment(&mut self, buffer: &str) -> MutationReport<CommitOutcome> {
        self.environment = Environment::parse(buffer);
        let variables = self.environment.len();
        info!(variables, "environment replaced");
        let persist_error = self.persist(Document::Environment).await;
        self.focus = self.list_focus();
        MutationReport {
            outcome: CommitOutcome::EnvironmentReplaced { variables },
            persist_error,
        }
    }

    fn create_collection(&mut self, name: String) -> ApplicationResult<CommitOutcome> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName.into());
        }
        if self.collections.iter().any(|c| c.name == name) {
            return Err(DomainError::DuplicateCollection(name).into());
        }
        self.collections.push(Collection::new(name.clone()));
        self.selection = Selection::collection(name.clone());
        Ok(CommitOutcome::CollectionCreated { collection: name })
    }

    fn rename_collection(
        &mut self,
        current: &str,
        name: String,
    ) -> ApplicationResult<CommitOutcome> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName.into());
        }
        if name != current && self.collections.iter().any(|c| c.name == name) {
            return Err(DomainError::DuplicateCollection(name).into());
        }
        let target = self.collection_mut(current)?;
        target.name.clone_from(&name);
        self.selection = Selection::collection(name.clone());
        Ok(CommitOutcome::CollectionRenamed {
            from: current.to_string(),
            to: name,
        })
    }

    fn create_request(
        &mut self,
        collection: &str,
        payload: RequestPayload,
    ) -> ApplicationResult<CommitOutcome> {
        let request = payload.into_request();
        let name = request.name.clone();
        self.collection_mut(collection)?.add_request(request)?;
        self.selection = Selection::request(collection, name.clone());
        Ok(CommitOutcome::RequestCreated {
            collection: collection.to_string(),
            request: name,
        })
    }

    fn update_request(
        &mut self,
        collection: &str,
        current: &str,
        payload: RequestPayload,
    ) -> ApplicationResult<CommitOutcome> {
        let name = payload.name.clone();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName.into());
        }
        let target = self.collection_mut(collection)?;
        if name != current && target.contains_request(&name) {
            return Err(DomainError::DuplicateRequest {
                collection: collection.to_string(),
                request: name,
            }
            .into());
        }
        let request = target
            .request_mut(current)
            .ok_or_else(|| DomainError::RequestNotFound(current.to_string()))?;
        payload.apply_to(request);
        self.selection = Selection::request(collection, name.clone());
        Ok(CommitOutcome::RequestUpdated {
            collection: collection.to_string(),
            request: name,
        })
    }

    fn delete_collection(&mut self, name: &str) -> ApplicationResult<DeleteOutcome> {
        let index = self
            .collections
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| DomainError::CollectionNotFound(name.to_string()))?;
        self.collections.remove(index);
        self.selection = Selection::None;
        Ok(DeleteOutcome::CollectionDeleted {
            collection: name.to_string(),
        })
    }

    fn delete_request(
        &mut self,
        collection: &str,
        request: &str,
    ) -> ApplicationResult<DeleteOutcome> {
        self.collection_mut(collection)?
            .remove_request(request)
            .ok_or_else(|| DomainError::RequestNotFound(request.to_string()))?;
        self.selection = self.selection.up();
        Ok(DeleteOutcome::RequestDeleted {
            collection: collection.to_string(),
            request: request.to_string(),
        })
    }

    fn collection_mut(&mut self, name: &str) -> ApplicationResult<&mut Collection> {
        self.collections
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DomainError::CollectionNotFound(name.to_string()).into())
    }

    /// The list panel focus returns to after leaving a text panel.
    #[must_use]
    pub const fn list_focus(&self) -> Focus {
        match self.selection {
            Selection::None => Focus::Collections,
            Selection::Collection { .. } | Selection::Request { .. } => Focus::Requests,
        }
    }

    async fn persist(&self, document: Document) -> Option<String> {
        let result = match document {
            Document::Collections => self.store.save_collections(&self.collections).await,
            Document::Environment => self.store.save_environment(&self.environment).await,
        };
        match result {
            Ok(()) => {
                debug!(%document, "document written");
                None
            }
            Err(e) => {
                error!(%document, error = %e, "document write failed");
                Some(e.to_string())
            }
        }
    }
}

const fn expected_shape(selection: &Selection) -> &'static str {
    match selection {
        Selection::None => "1 line (collection name)",
        Selection::Collection { .. } => "1 line (rename) or 5 lines (new request)",
        Selection::Request { .. } => "5 lines (name, verb, url, headers, body)",
    }
}
