//! dk-core: Core library for the dk dataset-pipeline storage glue
//!
//! This crate provides the SDK-independent pieces of datakit, including:
//! - Storage path parsing
//! - Lazy paginated listing and existence checks over the ObjectStore trait
//! - The projection mini-language for filtering listing pages
//! - Dataset parameter conversion and the dataset registry
//! - The batch dataset path convention
//! - Configuration management
//!
//! This crate is designed to be independent of any specific storage SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod batch;
pub mod case;
pub mod config;
pub mod dataset;
pub mod error;
pub mod listing;
pub mod path;
pub mod projection;
pub mod store;

pub use batch::{batch_dataset_path, batch_dataset_path_with, ZODIAC_SERVICE_ENV};
pub use case::pascal_to_snake_case;
pub use config::{Config, ConfigManager};
pub use dataset::{Dataset, DatasetRegistry, DatasetValue, ExecutorContext, Mode};
pub use error::{Error, Result};
pub use listing::{entries, exists, pages, search};
pub use path::{parse_storage_path, StoragePath};
pub use projection::Projection;
pub use store::{ListRequest, ListingEntry, ObjectPage, ObjectStore};
