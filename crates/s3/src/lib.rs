//! dk-s3: S3 SDK adapter for datakit
//!
//! This crate provides the implementation of the ObjectStore trait
//! using the aws-sdk-s3 crate, plus session/credential acquisition.
//! It is the only crate that directly depends on the AWS SDK.

pub mod client;
pub mod session;

pub use client::S3Store;
pub use session::{s3_client, sdk_config, REGION};
