//! Lazy listing and existence checks over an [`ObjectStore`]
//!
//! Listing results arrive in pages; the streams here fetch a page only when
//! the consumer advances past the previous one, so a listing of any size
//! holds at most one page in memory. A page-fetch failure surfaces exactly
//! where that page would have been produced.

use async_stream::try_stream;
use futures::Stream;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::path::parse_storage_path;
use crate::projection::Projection;
use crate::store::{ListRequest, ListingEntry, ObjectPage, ObjectStore};

/// Stream the raw pages of a listing
///
/// Forward-only and single-pass; the next page is requested only when the
/// consumer polls past the current one.
pub fn pages<'a, S>(
    store: &'a S,
    request: ListRequest,
) -> impl Stream<Item = Result<ObjectPage>> + 'a
where
    S: ObjectStore + ?Sized,
{
    try_stream! {
        let mut token: Option<String> = None;
        loop {
            let page = store.list_page(&request, token.take()).await?;
            let truncated = page.truncated;
            let next = page.continuation_token.clone();
            yield page;

            if !truncated {
                break;
            }
            // A truncated page without a token cannot be continued
            let Some(next) = next else { break };
            token = Some(next);
        }
    }
}

/// Stream every entry of a listing, page boundaries hidden
pub fn entries<'a, S>(
    store: &'a S,
    request: ListRequest,
) -> impl Stream<Item = Result<ListingEntry>> + 'a
where
    S: ObjectStore + ?Sized,
{
    try_stream! {
        for await page in pages(store, request) {
            for entry in page?.entries {
                yield entry;
            }
        }
    }
}

/// Stream the values a projection selects from each page of a listing
pub fn search<'a, S>(
    store: &'a S,
    request: ListRequest,
    projection: Projection,
) -> impl Stream<Item = Result<Value>> + 'a
where
    S: ObjectStore + ?Sized,
{
    try_stream! {
        for await page in pages(store, request) {
            let page = serde_json::to_value(&page?)?;
            for value in projection.apply(&page) {
                yield value;
            }
        }
    }
}

/// Check whether an object exists at a storage URI
///
/// Returns `Ok(false)` only when the backend reports not-found; every other
/// backend failure propagates. The container-root form (`s3://bucket`) is
/// rejected before any network call since there is no key to look up.
pub async fn exists<S>(store: &S, path: &str) -> Result<bool>
where
    S: ObjectStore + ?Sized,
{
    let parsed = parse_storage_path(path)?;
    if parsed.is_container_root() {
        return Err(Error::InvalidPath(format!(
            "'{path}' has no object key to check"
        )));
    }

    match store.head_entry(&parsed.container, &parsed.key).await {
        Ok(_) => Ok(true),
        Err(err) if err.is_not_found() => Ok(false),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::StreamExt;
    use mockall::predicate::eq;

    use super::*;
    use crate::store::MockObjectStore;

    /// Serves `total` numbered objects in pages of `page_size`, counting
    /// how many pages have actually been fetched.
    struct FakeStore {
        total: usize,
        page_size: usize,
        fetched: AtomicUsize,
        fail_on_page: Option<usize>,
    }

    impl FakeStore {
        fn new(total: usize, page_size: usize) -> Self {
            Self {
                total,
                page_size,
                fetched: AtomicUsize::new(0),
                fail_on_page: None,
            }
        }

        fn fetched(&self) -> usize {
            self.fetched.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn head_entry(&self, _container: &str, _key: &str) -> Result<ListingEntry> {
            unreachable!("listing tests never head");
        }

        async fn list_page(
            &self,
            request: &ListRequest,
            continuation_token: Option<String>,
        ) -> Result<ObjectPage> {
            let start: usize = continuation_token.map(|t| t.parse().unwrap()).unwrap_or(0);
            if self.fail_on_page == Some(start / self.page_size) {
                return Err(Error::Backend("SlowDown: please reduce request rate".into()));
            }
            self.fetched.fetch_add(1, Ordering::SeqCst);

            let prefix = request.prefix.as_deref().unwrap_or("");
            let end = (start + self.page_size).min(self.total);
            let entries = (start..end)
                .map(|i| ListingEntry::new(format!("{prefix}obj-{i:05}.bin"), 1))
                .collect();

            Ok(ObjectPage {
                entries,
                common_prefixes: Vec::new(),
                truncated: end < self.total,
                continuation_token: (end < self.total).then(|| end.to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_entries_consumes_full_listing() {
        let store = FakeStore::new(2500, 1000);
        let request = ListRequest::container("b").with_prefix("p/");

        let keys: Vec<_> = entries(&store, request)
            .map(|e| e.unwrap().key)
            .collect()
            .await;

        assert_eq!(keys.len(), 2500);
        assert_eq!(keys[0], "p/obj-00000.bin");
        assert_eq!(keys[2499], "p/obj-02499.bin");
        assert_eq!(store.fetched(), 3);
    }

    #[tokio::test]
    async fn test_entries_fetches_pages_only_on_demand() {
        let store = FakeStore::new(2500, 1000);
        let mut stream = std::pin::pin!(entries(&store, ListRequest::container("b")));

        // Nothing is fetched until the stream is polled
        assert_eq!(store.fetched(), 0);

        for _ in 0..1000 {
            stream.next().await.unwrap().unwrap();
        }
        assert_eq!(store.fetched(), 1);

        // Crossing the page boundary triggers exactly one more fetch
        stream.next().await.unwrap().unwrap();
        assert_eq!(store.fetched(), 2);
    }

    #[tokio::test]
    async fn test_page_failure_surfaces_at_its_boundary() {
        let mut store = FakeStore::new(2500, 1000);
        store.fail_on_page = Some(1);

        let mut stream = std::pin::pin!(entries(&store, ListRequest::container("b")));
        for _ in 0..1000 {
            assert!(stream.next().await.unwrap().is_ok());
        }

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_pages_yields_raw_page_structures() {
        let store = FakeStore::new(1500, 1000);
        let collected: Vec<_> = pages(&store, ListRequest::container("b"))
            .map(|p| p.unwrap())
            .collect()
            .await;

        assert_eq!(collected.len(), 2);
        assert!(collected[0].truncated);
        assert_eq!(collected[0].continuation_token.as_deref(), Some("1000"));
        assert!(!collected[1].truncated);
        assert_eq!(collected[1].entries.len(), 500);
    }

    #[tokio::test]
    async fn test_search_projects_each_page() {
        let store = FakeStore::new(1500, 1000);
        let projection = Projection::parse("entries[].key").unwrap();

        let keys: Vec<_> = search(&store, ListRequest::container("b"), projection)
            .map(|v| v.unwrap())
            .collect()
            .await;

        assert_eq!(keys.len(), 1500);
        assert_eq!(keys[0], serde_json::json!("obj-00000.bin"));
    }

    #[tokio::test]
    async fn test_exists_true() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_entry()
            .with(eq("my-bucket"), eq("a/b/c.txt"))
            .times(1)
            .returning(|_, key| Ok(ListingEntry::new(key, 42)));

        assert!(exists(&store, "s3://my-bucket/a/b/c.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_false_only_on_not_found() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_entry()
            .returning(|_, key| Err(Error::KeyNotFound(key.to_string())));

        assert!(!exists(&store, "s3://my-bucket/missing.bin").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_propagates_backend_errors() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_entry()
            .returning(|_, _| Err(Error::Backend("AccessDenied".into())));

        let err = exists(&store, "s3://my-bucket/secret.bin").await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }

    #[tokio::test]
    async fn test_exists_propagates_credential_errors() {
        let mut store = MockObjectStore::new();
        store
            .expect_head_entry()
            .returning(|_, _| Err(Error::Credential("assume role rejected".into())));

        let err = exists(&store, "s3://my-bucket/k").await.unwrap_err();
        assert!(matches!(err, Error::Credential(_)));
    }

    #[tokio::test]
    async fn test_exists_rejects_container_root_before_lookup() {
        // No expectation set: any head_entry call would panic the mock
        let store = MockObjectStore::new();
        let err = exists(&store, "s3://my-bucket").await.unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }
}
