// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::{Debug, Formatter};
use std::io::Cursor;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::{debug, info, Span};

use super::azure_rest::ContainerRestClient;
use super::config::{AzureConfig, ExistenceProbe};
use super::error::{StorageError, StorageResult};
use super::object_store::ObjectStoreClient;
use super::provider::{CloudStorage, ContentListing};
use crate::util::retry::poll_until;

/// Metadata attached to every container this crate creates.
pub const CONTAINER_METADATA: [(&str, &str); 1] = [("type", "created by cloud-bucket")];

/// Result of a Create Container call that reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
    /// 409 `ContainerBeingDeleted`: a delete of the same name is still in
    /// progress, which the service takes up to ~30 s to finish
    BeingDeleted,
}

/// Container-level operations of the Blob service.
#[async_trait]
pub trait ContainerControl: Send + Sync + Debug {
    /// Create the container with the given metadata, private access.
    async fn create_container(&self, metadata: &[(&str, &str)]) -> StorageResult<CreateOutcome>;

    async fn delete_container(&self) -> StorageResult<()>;

    /// Get Container Properties, `false` on 404.
    async fn container_exists(&self) -> StorageResult<bool>;
}

/// Azure Blob container backend.
pub struct AzureBlobBackend {
    config: AzureConfig,
    control: Arc<dyn ContainerControl>,
    data: ObjectStoreClient,
    listing: ContentListing,
    span: Span,
}

impl AzureBlobBackend {
    /// Validate the configuration and build both clients.
    ///
    /// # Errors
    ///
    /// `ConfigError` when the container name, account name or credentials
    /// are missing, or a client cannot be built from them.
    pub fn new(config: AzureConfig, span: Span) -> StorageResult<Self> {
        config.validate()?;
        let control = Arc::new(ContainerRestClient::new(&config)?);
        let data = ObjectStoreClient::for_azure(&config)?;
        Ok(Self::from_parts(config, control, data, span))
    }

    /// Assemble a backend from already built clients.
    pub fn from_parts(
        config: AzureConfig,
        control: Arc<dyn ContainerControl>,
        data: ObjectStoreClient,
        span: Span,
    ) -> Self {
        debug!(
            parent: &span,
            "Azure container backend for {} at {}",
            config.container_name,
            config.account_url()
        );
        Self {
            config,
            control,
            data,
            listing: ContentListing::default(),
            span,
        }
    }

    pub fn config(&self) -> &AzureConfig {
        &self.config
    }

    pub fn account_url(&self) -> String {
        self.config.account_url()
    }

    /// One existence check according to the configured probe.
    async fn probe_exists(&self) -> StorageResult<bool> {
        match self.config.existence_probe {
            ExistenceProbe::Properties => self.control.container_exists().await,
            ExistenceProbe::CreateDelete => {
                match self.control.create_container(&CONTAINER_METADATA).await? {
                    CreateOutcome::AlreadyExists => Ok(true),
                    // typically the previous probe's own delete
                    CreateOutcome::BeingDeleted => Ok(false),
                    CreateOutcome::Created => {
                        debug!(
                            parent: &self.span,
                            "Container {} did not exist, removing probe container",
                            self.config.container_name
                        );
                        self.control.delete_container().await?;
                        Ok(false)
                    }
                }
            }
        }
    }
}

#[async_trait]
impl CloudStorage for AzureBlobBackend {
    fn name(&self) -> &str {
        &self.config.container_name
    }

    fn listing(&self) -> &ContentListing {
        &self.listing
    }

    async fn create(&self) -> StorageResult<()> {
        let name = &self.config.container_name;
        match self.control.create_container(&CONTAINER_METADATA).await {
            Ok(CreateOutcome::Created) => {
                info!(parent: &self.span, "Created container {}", name);
                Ok(())
            }
            Ok(CreateOutcome::AlreadyExists) => {
                info!(parent: &self.span, "Container {} already exists", name);
                Err(StorageError::creation(name, "container already exists"))
            }
            Ok(CreateOutcome::BeingDeleted) => {
                info!(parent: &self.span, "Container {} is being deleted", name);
                Err(StorageError::creation(name, "container is being deleted"))
            }
            Err(e) => {
                info!(parent: &self.span, "Failed to create container {}: {}", name, e);
                Err(StorageError::creation(name, e))
            }
        }
    }

    async fn is_exist(&self) -> StorageResult<()> {
        let name = &self.config.container_name;
        if poll_until(self.config.poll, name, || self.probe_exists()).await? {
            Ok(())
        } else {
            Err(StorageError::ResourceUnavailable(name.clone()))
        }
    }

    async fn is_object_exist(&self, key: &str) -> StorageResult<()> {
        let name = &self.config.container_name;
        if poll_until(self.config.poll, key, || self.data.exists(key)).await? {
            Ok(())
        } else {
            Err(StorageError::not_found(name, key))
        }
    }

    async fn initialize_content(&mut self) -> StorageResult<()> {
        let names = self.data.list_names().await?;
        debug!(
            parent: &self.span,
            "Listed {} blobs in {}",
            names.len(),
            self.config.container_name
        );
        self.listing.replace(names);
        Ok(())
    }

    async fn download_fileobj(&self, key: &str) -> StorageResult<Cursor<Bytes>> {
        let data = self.data.get(key).await?;
        Ok(Cursor::new(data))
    }

    async fn upload_file(
        &self,
        file_obj: &mut (dyn AsyncRead + Send + Unpin),
        file_name: &str,
    ) -> StorageResult<()> {
        self.data.put(file_obj, file_name).await
    }
}

impl Debug for AzureBlobBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AzureBlobBackend(container={}, control={:?}, data={:?})",
            self.config.container_name, self.control, self.data
        )
    }
}
