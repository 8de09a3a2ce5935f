//! Listing types and the ObjectStore trait
//!
//! The trait is the seam between the SDK-independent listing logic and the
//! storage backend. It hands back one page per call; laziness across pages
//! lives in [`crate::listing`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One object record produced by a listing or metadata lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Owner display name, when the backend returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl ListingEntry {
    /// Create a new entry for an object of known size
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size as u64, humansize::BINARY)),
            last_modified: None,
            etag: None,
            storage_class: None,
            owner: None,
        }
    }
}

/// One page of listing results, as returned by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectPage {
    /// Objects on this page
    pub entries: Vec<ListingEntry>,

    /// Common prefixes (delimiter groupings) on this page
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub common_prefixes: Vec<String>,

    /// Whether more pages follow
    pub truncated: bool,

    /// Token for fetching the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

/// Parameters for a listing request
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Container (bucket) to list
    pub container: String,

    /// Key prefix to filter by
    pub prefix: Option<String>,

    /// Delimiter for grouping (usually "/")
    pub delimiter: Option<String>,

    /// Maximum number of keys per page
    pub page_size: Option<i32>,
}

impl ListRequest {
    /// Create a request listing everything in a container
    pub fn container(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            ..Default::default()
        }
    }

    /// Restrict the listing to a key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Group keys by a delimiter
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Cap the number of keys per page
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Trait for read-side object-storage operations
///
/// Implemented by the S3 adapter; mocked for testing the listing and
/// existence logic without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Metadata-only lookup of one exact key
    ///
    /// Must return [`crate::Error::KeyNotFound`] when the backend reports
    /// not-found, and a distinct error for every other failure.
    async fn head_entry(&self, container: &str, key: &str) -> Result<ListingEntry>;

    /// Fetch a single page of listing results
    async fn list_page(
        &self,
        request: &ListRequest,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_entry_new() {
        let entry = ListingEntry::new("scores/model_1.bin", 1024);
        assert_eq!(entry.key, "scores/model_1.bin");
        assert_eq!(entry.size_bytes, Some(1024));
        assert_eq!(entry.size_human.as_deref(), Some("1 KiB"));
        assert!(entry.last_modified.is_none());
    }

    #[test]
    fn test_list_request_builder() {
        let req = ListRequest::container("b")
            .with_prefix("p/")
            .with_delimiter("/")
            .with_page_size(500);
        assert_eq!(req.container, "b");
        assert_eq!(req.prefix.as_deref(), Some("p/"));
        assert_eq!(req.delimiter.as_deref(), Some("/"));
        assert_eq!(req.page_size, Some(500));
    }

    #[test]
    fn test_entry_serializes_without_empty_fields() {
        let entry = ListingEntry::new("k", 1);
        let json = serde_json::to_value(&entry).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("key"));
        assert!(!obj.contains_key("etag"));
        assert!(!obj.contains_key("last_modified"));
    }

    #[test]
    fn test_page_serializes_entries_field() {
        let page = ObjectPage {
            entries: vec![ListingEntry::new("a", 1)],
            ..Default::default()
        };
        let json = serde_json::to_value(&page).unwrap();
        assert!(json["entries"].is_array());
        assert!(json.get("common_prefixes").is_none());
    }
}
