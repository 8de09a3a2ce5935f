//! Storage path parsing
//!
//! Handles parsing of object-storage URIs in the format: scheme://container[/key]
//! The container is the URI's network location; the key is everything after it
//! with the single leading slash stripped.

use url::Url;

use crate::error::{Error, Result};

/// A parsed storage path pointing to an object-storage location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath {
    /// Container (bucket) name, non-empty
    pub container: String,
    /// Object key (empty for the container root)
    pub key: String,
}

impl StoragePath {
    /// Create a new StoragePath
    pub fn new(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
        }
    }

    /// Whether this path addresses the container root rather than an object
    pub fn is_container_root(&self) -> bool {
        self.key.is_empty()
    }

    /// Reconstruct the `s3://container/key` form of this path
    pub fn to_uri(&self) -> String {
        if self.key.is_empty() {
            format!("s3://{}", self.container)
        } else {
            format!("s3://{}/{}", self.container, self.key)
        }
    }
}

impl std::fmt::Display for StoragePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

/// Parse a URI-shaped string into a StoragePath
///
/// Any absolute URI with a host parses; a missing key segment yields an
/// empty key, which callers must treat as the container root.
pub fn parse_storage_path(path: &str) -> Result<StoragePath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let url = Url::parse(path)?;

    let container = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::InvalidPath(format!("Path '{path}' has no container")))?
        .to_string();

    let key = url.path().trim_start_matches('/').to_string();

    Ok(StoragePath { container, key })
}
