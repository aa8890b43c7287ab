use folio_core::service::onboarding::VISITED_KEY;
use folio_core::{
    baseline_portfolio, open_db, open_db_in_memory, KeyValueStore, OnboardingFlags,
    PortfolioStore, ProfileEditor, Section, SqliteKeyValueStore, StorageError,
};

#[test]
fn sqlite_medium_round_trips_values() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);

    assert_eq!(storage.get("missing").unwrap(), None);
    storage.set("a", "1").unwrap();
    storage.set("a", "2").unwrap();
    assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));

    storage.remove("a").unwrap();
    storage.remove("a").unwrap();
    assert_eq!(storage.get("a").unwrap(), None);

    assert!(matches!(storage.set(" ", "x"), Err(StorageError::InvalidKey)));
}

#[test]
fn overrides_persist_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.db");

    {
        let conn = open_db(&path).unwrap();
        let mut store = PortfolioStore::open(SqliteKeyValueStore::new(&conn));
        let mut editor = ProfileEditor::from_store(&store);
        editor.begin_edit().contact.email = "me@example.com".to_string();
        assert!(editor.save(&mut store).unwrap());
    }

    let conn = open_db(&path).unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let store = PortfolioStore::open(&storage);
    assert_eq!(store.data().contact.email, "me@example.com");
    assert_eq!(store.data().projects, baseline_portfolio().projects);

    let keys = storage.keys().unwrap();
    assert!(keys.contains(&Section::Contact.storage_key().to_string()));
    assert!(keys.contains(&Section::PersonalInfo.storage_key().to_string()));
}

#[test]
fn onboarding_flags_share_the_sqlite_medium() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let flags = OnboardingFlags::new(&storage);
    assert!(flags.should_show());

    flags.complete().unwrap();
    assert!(!flags.should_show());
    assert_eq!(storage.get(VISITED_KEY).unwrap().as_deref(), Some("true"));

    let mut store = PortfolioStore::open(&storage);
    store.clear_all().unwrap();
    assert!(!flags.should_show());
}
