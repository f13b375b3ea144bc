// Copyright 2022 Adobe. All rights reserved.
// This file is licensed to you under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License. You may obtain a copy
// of the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under
// the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR REPRESENTATIONS
// OF ANY KIND, either express or implied. See the License for the specific language
// governing permissions and limitations under the License.

use async_trait::async_trait;
use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use std::io::Cursor;
use std::path::Path;
use tokio::io::AsyncRead;

use super::error::{StorageError, StorageResult};

/// Object names of a bucket/container as of the last listing.
///
/// Only replaced wholesale by `initialize_content`, never refreshed on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentListing {
    names: Vec<String>,
}

impl ContentListing {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub(crate) fn replace(&mut self, names: Vec<String>) {
        self.names = names;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

/// Uniform operations over a bucket/container of any provider
///
/// This trait provides a unified interface for S3-compatible buckets and
/// Azure Blob containers. The content listing is cached locally and only
/// changes when [`initialize_content`](CloudStorage::initialize_content) runs;
/// membership and size queries never go to the network.
#[async_trait]
pub trait CloudStorage: Send + Sync {
    /// Bucket/container identifier.
    fn name(&self) -> &str;

    /// The cached content listing.
    fn listing(&self) -> &ContentListing;

    /// Provision the bucket/container.
    ///
    /// # Errors
    ///
    /// * `ResourceCreationError` - the resource already exists or the caller
    ///   is not allowed to create it
    async fn create(&self) -> StorageResult<()>;

    /// Wait until the bucket/container is confirmed to exist.
    ///
    /// Polls within the backend's attempt/delay budget.
    ///
    /// # Errors
    ///
    /// * `ResourceUnavailable` - the budget ran out without confirmation
    async fn is_exist(&self) -> StorageResult<()>;

    /// Wait until an object is confirmed to exist, same budget as `is_exist`.
    ///
    /// # Errors
    ///
    /// * `ObjectNotFound` - the budget ran out without confirmation
    async fn is_object_exist(&self, key: &str) -> StorageResult<()>;

    /// Re-list every object visible to the credentials and replace the cache.
    async fn initialize_content(&mut self) -> StorageResult<()>;

    /// Fetch a whole object into memory.
    ///
    /// # Returns
    ///
    /// A cursor over the object bytes, positioned at the start.
    ///
    /// # Errors
    ///
    /// * `ObjectNotFound` - no object under `key`
    /// * transport errors from the provider
    async fn download_fileobj(&self, key: &str) -> StorageResult<Cursor<Bytes>>;

    /// Download an object and write it to `path`, replacing any existing file.
    async fn download_file(&self, key: &str, path: &Path) -> StorageResult<()> {
        let file_obj = self.download_fileobj(key).await?;
        tokio::fs::write(path, file_obj.get_ref()).await?;
        Ok(())
    }

    /// Stream `file_obj` to the object `file_name`, overwriting it.
    async fn upload_file(
        &self,
        file_obj: &mut (dyn AsyncRead + Send + Unpin),
        file_name: &str,
    ) -> StorageResult<()>;

    /// Whether `file_name` is in the cached listing.
    fn contains(&self, file_name: &str) -> bool {
        self.listing().contains(file_name)
    }

    fn len(&self) -> usize {
        self.listing().len()
    }

    fn is_empty(&self) -> bool {
        self.listing().is_empty()
    }

    /// Object names from the cached listing; every call starts over.
    fn content(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.listing().names())
    }
}

/// Object path for `key`, kept verbatim (no percent-encoding).
///
/// Names the client cannot address as given are rejected: empty names,
/// a leading or trailing `/`, empty, `.` or `..` segments and control
/// characters.
pub(crate) fn object_path(key: &str) -> StorageResult<ObjectPath> {
    let invalid = |reason: String| StorageError::InvalidObjectName {
        key: key.to_string(),
        reason,
    };
    if key.is_empty() {
        return Err(invalid("empty name".to_string()));
    }
    if key.starts_with('/') || key.ends_with('/') {
        return Err(invalid("leading or trailing '/'".to_string()));
    }
    ObjectPath::parse(key).map_err(|e| invalid(e.to_string()))
}
