//! Navigation and selection state.
//!
//! The selection is a three-level machine: nothing active, a collection
//! active, or a collection and one of its requests active. Entities are
//! referenced by name, never by borrowed pointer, so a list item only has
//! to remember the key it was built from.

use postbox_domain::Collection;
use postbox_domain::edit_buffer::{encode_collection, encode_request};

/// Which entities are active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing is active.
    #[default]
    None,
    /// A collection is active, no request.
    Collection {
        /// Active collection name.
        collection: String,
    },
    /// A collection and one of its requests are active.
    Request {
        /// Active collection name.
        collection: String,
        /// Active request name.
        request: String,
    },
}

impl Selection {
    /// Selects a collection with no active request.
    #[must_use]
    pub fn collection(name: impl Into<String>) -> Self {
        Self::Collection {
            collection: name.into(),
        }
    }

    /// Selects a request inside a collection.
    #[must_use]
    pub fn request(collection: impl Into<String>, request: impl Into<String>) -> Self {
        Self::Request {
            collection: collection.into(),
            request: request.into(),
        }
    }

    /// Name of the active collection, if any.
    #[must_use]
    pub fn collection_name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Collection { collection } | Self::Request { collection, .. } => {
                Some(collection)
            }
        }
    }

    /// Name of the active request, if any.
    #[must_use]
    pub fn request_name(&self) -> Option<&str> {
        match self {
            Self::Request { request, .. } => Some(request),
            _ => None,
        }
    }

    /// Moves one level up: request to collection, collection to nothing.
    #[must_use]
    pub fn up(&self) -> Self {
        match self {
            Self::Request { collection, .. } => Self::collection(collection.clone()),
            Self::Collection { .. } | Self::None => Self::None,
        }
    }
}

/// The panels that can hold input focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    /// Collection list.
    #[default]
    Collections,
    /// Request list of the active collection.
    Requests,
    /// The edit buffer.
    Editor,
    /// Read-only response viewer.
    Viewer,
    /// Environment editor.
    Environment,
}

impl Focus {
    /// Panel title used by the terminal shell.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Collections => "Collections",
            Self::Requests => "Requests",
            Self::Editor => "Request Editor",
            Self::Viewer => "Response",
            Self::Environment => "Environment",
        }
    }

    /// Returns true for the two text-input panels.
    #[must_use]
    pub const fn is_text_input(self) -> bool {
        matches!(self, Self::Editor | Self::Environment)
    }
}

/// The two navigable lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// All collections.
    Collections,
    /// Requests of the active collection.
    Requests,
}

/// What the user is about to do in the edit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Start from an empty buffer.
    Create,
    /// Edit the active request in full.
    UpdateExisting,
    /// Rename the active collection.
    Rename,
}

/// Names to show in a list, in display order.
#[must_use]
pub fn display_list(
    collections: &[Collection],
    selection: &Selection,
    list: ListKind,
) -> Vec<String> {
    match list {
        ListKind::Collections => collections.iter().map(|c| c.name.clone()).collect(),
        ListKind::Requests => selection
            .collection_name()
            .and_then(|name| collections.iter().find(|c| c.name == name))
            .map(Collection::request_names)
            .unwrap_or_default(),
    }
}

/// Text to pre-load into the edit buffer.
///
/// Returns `None` if the action needs an active entity that does not exist.
#[must_use]
pub fn editor_seed(
    collections: &[Collection],
    selection: &Selection,
    action: EditorAction,
) -> Option<String> {
    let collection = selection
        .collection_name()
        .and_then(|name| collections.iter().find(|c| c.name == name));
    match action {
        EditorAction::Create => Some(String::new()),
        EditorAction::Rename => collection.map(encode_collection),
        EditorAction::UpdateExisting => {
            let request = collection?.request(selection.request_name()?)?;
            Some(encode_request(request))
        }
    }
}
