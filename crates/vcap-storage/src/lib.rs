//! S3 object storage client.
//!
//! This crate provides:
//! - The `ObjectStore` contract the pipeline depends on (put + presign)
//! - An `aws-sdk-s3` backed implementation
//! - An in-memory implementation for local runs and tests
//! - The object key layout shared by uploads, captions and rendered output

pub mod client;
pub mod error;
pub mod keys;
pub mod memory;
pub mod store;

pub use client::{S3Client, S3Config};
pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryStore, StoredObject};
pub use store::ObjectStore;
