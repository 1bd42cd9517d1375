//! Integration tests for persistence and the commit protocol
//!
//! These tests drive the workspace state machine against the file-based
//! store and check what actually lands on disk.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};

use postbox_application::{CommitOutcome, DeleteOutcome, Focus, ListKind, Selection, Workspace};
use postbox_domain::{Collection, Environment, Request, UserSettings};
use postbox_infrastructure::{JsonWorkspaceStore, TokioFileSystem};

type Store = JsonWorkspaceStore<TokioFileSystem>;

fn settings(dir: &TempDir) -> UserSettings {
    UserSettings::default().with_data_dir(dir.path().join("db"))
}

fn store(dir: &TempDir) -> Store {
    JsonWorkspaceStore::from_settings(TokioFileSystem::new(), &settings(dir))
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).expect("document should exist"))
        .expect("document should be valid JSON")
}

#[tokio::test]
async fn test_first_run_starts_empty_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let workspace = Workspace::load(store(&dir)).await;

    assert!(workspace.collections().is_empty());
    assert!(workspace.environment().is_empty());
    assert!(!dir.path().join("db").exists());
}

#[tokio::test]
async fn test_create_and_update_scenario() {
    let dir = tempdir().unwrap();
    let mut workspace = Workspace::load(store(&dir)).await;

    workspace.set_focus(Focus::Editor);
    let report = workspace.commit("Demo").await;
    assert_eq!(report.persist_error, None);

    workspace.commit("Ping\nGET\nhttps://example.com\n{}\nnull").await;
    let saved = read_json(&settings(&dir).collections_path());
    assert_eq!(
        saved,
        serde_json::json!([{
            "name": "Demo",
            "requests": [{
                "name": "Ping",
                "verb": "GET",
                "url": "https://example.com",
                "headers": {},
                "body": null
            }]
        }])
    );

    workspace.set_focus(Focus::Requests);
    assert!(workspace.select_request("Ping").is_some());
    workspace.set_focus(Focus::Editor);
    let report = workspace
        .commit("Ping\nPOST\nhttps://example.com\n{\"X\":\"1\"}\n\"hi\"")
        .await;
    assert!(matches!(report.outcome, CommitOutcome::RequestUpdated { .. }));

    let reloaded = Workspace::load(store(&dir)).await;
    assert_eq!(
        reloaded.collections(),
        &[Collection::new("Demo").with_request(Request {
            name: "Ping".into(),
            verb: "POST".into(),
            url: "https://example.com".into(),
            headers: [("X".to_string(), "1".to_string())].into_iter().collect(),
            body: serde_json::json!("hi"),
        })]
    );
}

#[tokio::test]
async fn test_rejected_commit_leaves_disk_untouched() {
    let dir = tempdir().unwrap();
    let mut workspace = Workspace::load(store(&dir)).await;
    workspace.commit("Demo").await;
    let before = std::fs::read_to_string(settings(&dir).collections_path()).unwrap();

    workspace.set_focus(Focus::Editor);
    let report = workspace.commit("a\nb\nc").await;

    assert!(report.outcome.is_rejected());
    assert_eq!(workspace.focus(), Focus::Editor);
    let after = std::fs::read_to_string(settings(&dir).collections_path()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_delete_persists_and_moves_selection_up() {
    let dir = tempdir().unwrap();
    let mut workspace = Workspace::load(store(&dir)).await;
    workspace.commit("Demo").await;
    workspace.commit("Ping\nGET\nhttps://example.com\n{}\nnull").await;
    workspace.set_focus(Focus::Requests);

    let report = workspace.activate_delete().await;

    assert!(matches!(report.outcome, DeleteOutcome::RequestDeleted { .. }));
    assert_eq!(workspace.selection(), &Selection::collection("Demo"));
    let reloaded = Workspace::load(store(&dir)).await;
    assert_eq!(reloaded.collections(), &[Collection::new("Demo")]);

    workspace.set_focus(Focus::Collections);
    workspace.activate_delete().await;
    let reloaded = Workspace::load(store(&dir)).await;
    assert!(reloaded.display_list(ListKind::Collections).is_empty());
}

#[tokio::test]
async fn test_environment_document_is_independent() {
    let dir = tempdir().unwrap();
    let mut workspace = Workspace::load(store(&dir)).await;

    workspace.set_focus(Focus::Environment);
    workspace.commit("HOST=localhost\nTOKEN=a=b").await;

    assert!(!settings(&dir).collections_path().exists());
    assert_eq!(
        read_json(&settings(&dir).environment_path()),
        serde_json::json!([
            {"key": "HOST", "value": "localhost"},
            {"key": "TOKEN", "value": "a=b"}
        ])
    );

    let reloaded = Workspace::load(store(&dir)).await;
    assert_eq!(reloaded.environment(), &Environment::parse("HOST=localhost\nTOKEN=a=b"));
}

#[tokio::test]
async fn test_corrupt_document_loads_empty() {
    let dir = tempdir().unwrap();
    let settings = settings(&dir);
    std::fs::create_dir_all(&settings.data_dir).unwrap();
    std::fs::write(settings.collections_path(), "{ not json").unwrap();
    std::fs::write(settings.environment_path(), "[{\"key\":\"A\",\"value\":\"1\"}]").unwrap();

    let workspace = Workspace::load(store(&dir)).await;

    assert!(workspace.collections().is_empty());
    assert_eq!(workspace.environment().get("A"), Some("1"));
}
