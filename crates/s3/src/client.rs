//! S3 store implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from dk-core.
//! Not-found is detected from the modeled error variant or the raw HTTP
//! status, never from the error message text. Every other backend failure
//! is logged with its full payload here, at the point of detection, before
//! being returned.

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;

use dk_core::{Error, ListRequest, ListingEntry, ObjectPage, ObjectStore, Result, StoragePath};

use crate::session;

/// S3-backed object store
pub struct S3Store {
    inner: aws_sdk_s3::Client,
}

impl S3Store {
    /// Wrap an existing S3 client
    pub fn new(inner: aws_sdk_s3::Client) -> Self {
        Self { inner }
    }

    /// Connect with ambient credentials, or through an assumed role
    pub async fn connect(role_arn: Option<&str>) -> Self {
        Self::new(session::s3_client(role_arn).await)
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// Convert an SDK timestamp to a jiff timestamp
fn timestamp(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::from_second(dt.secs()).ok()
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn head_entry(&self, container: &str, key: &str) -> Result<ListingEntry> {
        let response = self
            .inner
            .head_object()
            .bucket(container)
            .key(key)
            .send()
            .await;

        match response {
            Ok(response) => {
                let mut entry = ListingEntry::new(key, response.content_length().unwrap_or(0));
                entry.last_modified = response.last_modified().and_then(timestamp);
                if let Some(etag) = response.e_tag() {
                    entry.etag = Some(etag.trim_matches('"').to_string());
                }
                if let Some(sc) = response.storage_class() {
                    entry.storage_class = Some(sc.as_str().to_string());
                }
                Ok(entry)
            }
            Err(err) => {
                if matches!(err, SdkError::ConstructionFailure(_)) {
                    return Err(Error::Credential(DisplayErrorContext(&err).to_string()));
                }

                let status = err.raw_response().map(|r| r.status().as_u16());
                let not_found = status == Some(404)
                    || matches!(&err, SdkError::ServiceError(ctx) if ctx.err().is_not_found());
                if not_found {
                    return Err(Error::KeyNotFound(StoragePath::new(container, key).to_uri()));
                }

                tracing::error!(
                    operation = "head_object",
                    container,
                    key,
                    status,
                    error = %DisplayErrorContext(&err),
                    "backend error"
                );
                Err(Error::Backend(DisplayErrorContext(&err).to_string()))
            }
        }
    }

    async fn list_page(
        &self,
        request: &ListRequest,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage> {
        let mut builder = self.inner.list_objects_v2().bucket(&request.container);

        if let Some(prefix) = &request.prefix {
            builder = builder.prefix(prefix);
        }
        if let Some(delimiter) = &request.delimiter {
            builder = builder.delimiter(delimiter);
        }
        if let Some(page_size) = request.page_size {
            builder = builder.max_keys(page_size);
        }
        if let Some(token) = continuation_token {
            builder = builder.continuation_token(token);
        }

        let response = builder.send().await.map_err(|err| {
            if matches!(err, SdkError::ConstructionFailure(_)) {
                return Error::Credential(DisplayErrorContext(&err).to_string());
            }

            let status = err.raw_response().map(|r| r.status().as_u16());
            let no_such_bucket =
                matches!(&err, SdkError::ServiceError(ctx) if ctx.err().is_no_such_bucket());
            if no_such_bucket {
                return Error::ContainerNotFound(request.container.clone());
            }

            tracing::error!(
                operation = "list_objects_v2",
                container = %request.container,
                status,
                error = %DisplayErrorContext(&err),
                "backend error"
            );
            Error::Backend(DisplayErrorContext(&err).to_string())
        })?;

        let mut entries = Vec::with_capacity(response.contents().len());
        for object in response.contents() {
            let key = object.key().unwrap_or_default().to_string();
            let mut entry = ListingEntry::new(key, object.size().unwrap_or(0));
            entry.last_modified = object.last_modified().and_then(timestamp);
            if let Some(etag) = object.e_tag() {
                entry.etag = Some(etag.trim_matches('"').to_string());
            }
            if let Some(sc) = object.storage_class() {
                entry.storage_class = Some(sc.as_str().to_string());
            }
            if let Some(owner) = object.owner().and_then(|o| o.display_name()) {
                entry.owner = Some(owner.to_string());
            }
            entries.push(entry);
        }

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|p| p.prefix().map(str::to_string))
            .collect();

        Ok(ObjectPage {
            entries,
            common_prefixes,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(str::to_string),
        })
    }
}
