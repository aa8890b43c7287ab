use folio_core::{
    baseline_portfolio, decode_portfolio_document, ImportError, InMemoryKeyValueStore,
    PortfolioStore, Section, StoreError,
};

#[test]
fn export_then_import_reproduces_aggregate() {
    let storage = InMemoryKeyValueStore::new();
    let mut store = PortfolioStore::open(&storage);
    let mut edited = baseline_portfolio();
    edited.projects.reverse();
    edited.personal_info.tagline = "Shipping things".to_string();
    store.import_all(edited.clone()).unwrap();

    let document = store.export_document().unwrap();
    assert_eq!(decode_portfolio_document(&document).unwrap(), edited);

    let other_storage = InMemoryKeyValueStore::new();
    let mut other = PortfolioStore::open(&other_storage);
    other.import_document(&document).unwrap();
    assert_eq!(other.export_all(), &edited);
    assert_eq!(PortfolioStore::open(&other_storage).data(), &edited);
}

#[test]
fn document_missing_projects_is_rejected_without_side_effects() {
    let storage = InMemoryKeyValueStore::new();
    let mut store = PortfolioStore::open(&storage);

    let mut value = serde_json::to_value(baseline_portfolio()).unwrap();
    value.as_object_mut().unwrap().remove("projects");
    let err = store.import_document(&value.to_string()).unwrap_err();

    match err {
        StoreError::Import(ImportError::MissingSection(section)) => {
            assert_eq!(section, Section::Projects);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.data(), &baseline_portfolio());
    assert!(storage.is_empty());
}

#[test]
fn malformed_json_has_parse_message() {
    let storage = InMemoryKeyValueStore::new();
    let mut store = PortfolioStore::open(&storage);

    let err = store.import_document("{ nope").unwrap_err();
    let StoreError::Import(import_err) = err else {
        panic!("expected import error");
    };
    assert_eq!(
        import_err.user_message(),
        "Error parsing JSON file. Please check the file format."
    );
}

#[test]
fn section_with_wrong_shape_is_rejected() {
    let mut value = serde_json::to_value(baseline_portfolio()).unwrap();
    value["skills"] = serde_json::json!({ "not": "an array" });

    let err = decode_portfolio_document(&value.to_string()).unwrap_err();
    assert!(matches!(
        err,
        ImportError::InvalidSection {
            section: Section::Skills,
            ..
        }
    ));
    assert!(err.user_message().starts_with("Invalid data format."));
}

#[test]
fn failed_import_write_keeps_memory_and_earlier_sections() {
    let storage = InMemoryKeyValueStore::new();
    let mut store = PortfolioStore::open(&storage);
    let mut edited = baseline_portfolio();
    edited.projects.truncate(2);

    storage.fail_writes_after(2);
    let err = store.import_all(edited).unwrap_err();

    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(store.data(), &baseline_portfolio());
    assert_eq!(storage.len(), 2);
    assert!(storage.contains_key(Section::ALL[0].storage_key()));
}
