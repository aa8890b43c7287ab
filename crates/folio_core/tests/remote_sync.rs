use folio_core::sync::remote::DEFAULT_COMMIT_MESSAGE;
use folio_core::{
    baseline_portfolio, encode_portfolio_document, ImportError, InMemoryKeyValueStore,
    PortfolioStore, RemoteDocument, RemoteDocumentStore, RemoteSync, SyncError, SyncResult,
};
use std::cell::{Cell, RefCell};

/// Versioned single-document remote held in memory.
#[derive(Default)]
struct FakeRemote {
    document: RefCell<Option<RemoteDocument>>,
    revision: Cell<u32>,
    messages: RefCell<Vec<String>>,
}

impl FakeRemote {
    fn seeded(content: &str) -> Self {
        let remote = Self::default();
        remote
            .put(content, None, "seed")
            .expect("seeding fake remote");
        remote
    }
}

impl RemoteDocumentStore for FakeRemote {
    fn fetch(&self) -> SyncResult<Option<RemoteDocument>> {
        Ok(self.document.borrow().clone())
    }

    fn put(&self, content: &str, previous_sha: Option<&str>, message: &str) -> SyncResult<String> {
        let current = self.document.borrow().as_ref().map(|doc| doc.sha.clone());
        if current.as_deref() != previous_sha {
            return Err(SyncError::Status {
                status: 409,
                message: "sha mismatch".to_string(),
            });
        }
        self.revision.set(self.revision.get() + 1);
        let sha = format!("rev-{}", self.revision.get());
        *self.document.borrow_mut() = Some(RemoteDocument {
            content: content.to_string(),
            sha: sha.clone(),
        });
        self.messages.borrow_mut().push(message.to_string());
        Ok(sha)
    }
}

#[test]
fn push_then_pull_reproduces_aggregate() {
    let sync = RemoteSync::new(FakeRemote::default());
    let mut edited = baseline_portfolio();
    edited.skills.truncate(3);

    let first = sync.push(&edited).unwrap();
    assert_eq!(first, "rev-1");
    assert_eq!(sync.pull().unwrap(), edited);

    edited.projects.pop();
    let second = sync.push(&edited).unwrap();
    assert_eq!(second, "rev-2");
    assert_eq!(sync.pull().unwrap(), edited);
    assert_eq!(
        sync.remote().messages.borrow().as_slice(),
        [DEFAULT_COMMIT_MESSAGE, DEFAULT_COMMIT_MESSAGE]
    );
}

#[test]
fn pull_from_empty_remote_is_not_found() {
    let sync = RemoteSync::new(FakeRemote::default());
    assert!(matches!(sync.pull(), Err(SyncError::NotFound)));
}

#[test]
fn pull_rejects_invalid_document() {
    let sync = RemoteSync::new(FakeRemote::seeded(r#"{"skills": []}"#));
    assert!(matches!(
        sync.pull(),
        Err(SyncError::Decode(ImportError::MissingSection(_)))
    ));
}

#[test]
fn push_refuses_aggregate_with_duplicate_ids() {
    let sync = RemoteSync::new(FakeRemote::default());
    let mut broken = baseline_portfolio();
    let duplicate = broken.projects[0].clone();
    broken.projects.push(duplicate);

    assert!(matches!(
        sync.push(&broken),
        Err(SyncError::Decode(ImportError::Validation(_)))
    ));
    assert!(sync.remote().fetch().unwrap().is_none());
}

#[test]
fn pull_into_imports_remote_aggregate() {
    let mut remote_data = baseline_portfolio();
    remote_data.personal_info.name = "Remote Name".to_string();
    let sync = RemoteSync::new(FakeRemote::seeded(
        &encode_portfolio_document(&remote_data).unwrap(),
    ));

    let storage = InMemoryKeyValueStore::new();
    let mut store = PortfolioStore::open(&storage);
    sync.pull_into(&mut store).unwrap();

    assert_eq!(store.data(), &remote_data);
    assert_eq!(PortfolioStore::open(&storage).data(), &remote_data);
}
