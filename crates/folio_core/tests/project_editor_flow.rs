use chrono::{TimeZone, Utc};
use folio_core::{
    baseline_portfolio, DraftRejection, EditorError, InMemoryKeyValueStore, PortfolioStore,
    ProjectEditor, ProjectStatus, SaveOutcome,
};

#[test]
fn add_project_appends_with_unique_id() {
    let storage = InMemoryKeyValueStore::new();
    let mut store = PortfolioStore::open(&storage);
    let mut editor = ProjectEditor::from_store(&store);
    assert_eq!(editor.projects().len(), 4);

    let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    let draft = editor.begin_add(now);
    assert_eq!(draft.status, ProjectStatus::Planned);
    assert_eq!(draft.created_date, "2024-05-06");
    draft.title = "T".to_string();
    draft.description = "D".to_string();

    let outcome = editor.save().unwrap();
    let SaveOutcome::Saved { id, created } = outcome else {
        panic!("expected save");
    };
    assert!(created);
    assert!(!editor.is_editing());

    let projects = editor.projects();
    assert_eq!(projects.len(), 5);
    let last = projects.last().unwrap();
    assert_eq!(last.id, id);
    assert_eq!(last.title, "T");
    assert_eq!(last.description, "D");
    assert!(!last.id.is_empty());
    assert_eq!(
        projects.iter().filter(|project| project.id == last.id).count(),
        1
    );

    assert!(editor.has_unsaved_changes());
    editor.commit(&mut store).unwrap();
    assert!(!editor.has_unsaved_changes());
    assert_eq!(store.data().projects.len(), 5);
}

#[test]
fn empty_title_save_returns_to_list_without_changes() {
    let storage = InMemoryKeyValueStore::new();
    let store = PortfolioStore::open(&storage);
    let mut editor = ProjectEditor::from_store(&store);

    let draft = editor.begin_add(Utc::now());
    draft.description = "D".to_string();

    assert_eq!(
        editor.save().unwrap(),
        SaveOutcome::Discarded(DraftRejection::EmptyTitle)
    );
    assert!(!editor.is_editing());
    assert_eq!(editor.projects(), baseline_portfolio().projects.as_slice());
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn empty_description_on_edit_is_discarded() {
    let storage = InMemoryKeyValueStore::new();
    let store = PortfolioStore::open(&storage);
    let mut editor = ProjectEditor::from_store(&store);

    editor.begin_edit("2").unwrap().description = " ".to_string();
    assert_eq!(
        editor.save().unwrap(),
        SaveOutcome::Discarded(DraftRejection::EmptyDescription)
    );
    assert_eq!(editor.projects(), baseline_portfolio().projects.as_slice());
}

#[test]
fn edit_replaces_in_place() {
    let storage = InMemoryKeyValueStore::new();
    let store = PortfolioStore::open(&storage);
    let mut editor = ProjectEditor::from_store(&store);

    editor.begin_edit("3").unwrap().title = "Renamed".to_string();
    assert_eq!(
        editor.save().unwrap(),
        SaveOutcome::Saved {
            id: "3".to_string(),
            created: false
        }
    );
    assert_eq!(editor.projects()[2].title, "Renamed");
    assert_eq!(editor.projects().len(), 4);
}

#[test]
fn changing_id_to_taken_value_is_rejected() {
    let storage = InMemoryKeyValueStore::new();
    let store = PortfolioStore::open(&storage);
    let mut editor = ProjectEditor::from_store(&store);

    editor.begin_edit("3").unwrap().id = "1".to_string();
    assert_eq!(
        editor.save().unwrap(),
        SaveOutcome::Discarded(DraftRejection::DuplicateId("1".to_string()))
    );
}

#[test]
fn delete_removes_one_and_preserves_order() {
    let storage = InMemoryKeyValueStore::new();
    let mut store = PortfolioStore::open(&storage);
    let mut editor = ProjectEditor::from_store(&store);

    assert!(!editor.delete("2", |_| false).unwrap());
    assert_eq!(editor.projects().len(), 4);

    assert!(editor.delete("2", |project| project.id == "2").unwrap());
    let ids: Vec<&str> = editor.projects().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3", "4"]);

    assert_eq!(
        editor.delete("missing", |_| true),
        Err(EditorError::ProjectNotFound("missing".to_string()))
    );

    editor.commit(&mut store).unwrap();
    let reopened = PortfolioStore::open(&storage);
    assert_eq!(reopened.data().projects.len(), 3);
}

#[test]
fn save_without_draft_is_an_error() {
    let mut editor = ProjectEditor::new(Vec::new());
    assert_eq!(editor.save(), Err(EditorError::NotEditing));
}

#[test]
fn revert_and_stats_track_working_list() {
    let storage = InMemoryKeyValueStore::new();
    let store = PortfolioStore::open(&storage);
    let mut editor = ProjectEditor::from_store(&store);
    let before = editor.stats();
    assert_eq!(before.total, 4);

    editor.delete("1", |_| true).unwrap();
    assert_eq!(editor.stats().total, 3);

    editor.revert();
    assert_eq!(editor.stats(), before);
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn failed_commit_keeps_changes_pending() {
    let storage = InMemoryKeyValueStore::new();
    let mut store = PortfolioStore::open(&storage);
    let mut editor = ProjectEditor::from_store(&store);
    editor.delete("4", |_| true).unwrap();

    storage.fail_writes_after(0);
    assert!(editor.commit(&mut store).is_err());
    assert!(editor.has_unsaved_changes());
    assert_eq!(store.data().projects.len(), 4);

    storage.allow_writes();
    editor.commit(&mut store).unwrap();
    assert_eq!(store.data().projects.len(), 3);
}
