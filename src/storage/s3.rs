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
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::fmt::{Debug, Formatter};
use std::io::Cursor;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::{debug, info, Span};

use super::config::S3Config;
use super::error::{StorageError, StorageResult};
use super::object_store::ObjectStoreClient;
use super::provider::{CloudStorage, ContentListing};
use crate::util::retry::poll_until;

/// us-east-1 is the default location and rejects an explicit constraint
const US_EAST_1: &str = "us-east-1";

/// Bucket-level operations of the S3 API.
#[async_trait]
pub trait BucketControl: Send + Sync + Debug {
    /// Create a private bucket located in `region`.
    ///
    /// # Errors
    ///
    /// `ResourceCreationError` with the provider cause.
    async fn create_bucket(&self, bucket: &str, region: &str) -> StorageResult<()>;

    /// Single HeadBucket check.
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool>;

    /// Single HeadObject check.
    async fn object_exists(&self, bucket: &str, key: &str) -> StorageResult<bool>;

    /// Every key of the bucket exactly as S3 stores it.
    async fn list_keys(&self, bucket: &str) -> StorageResult<Vec<String>>;
}

/// `BucketControl` over the AWS SDK.
pub struct SdkBucketControl {
    client: Client,
}

impl SdkBucketControl {
    /// Build an SDK client for the configured region, keys and endpoint.
    ///
    /// Without keys the default credential chain of `aws-config` applies.
    pub async fn new(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(config.region.clone()));
        if let (Some(key_id), Some(secret_key)) = (&config.key_id, &config.secret_key) {
            loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
                key_id,
                secret_key,
                config.session_token.clone(),
                None,
                "cloud-bucket",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl BucketControl for SdkBucketControl {
    async fn create_bucket(&self, bucket: &str, region: &str) -> StorageResult<()> {
        let mut request = self
            .client
            .create_bucket()
            .bucket(bucket)
            .acl(BucketCannedAcl::Private)
            .object_lock_enabled_for_bucket(false);
        if region != US_EAST_1 {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }
        request
            .send()
            .await
            .map(|_| ())
            .map_err(|e| StorageError::creation(bucket, DisplayErrorContext(&e)))
    }

    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            // 301 (other region) and 403 (not ours) still mean the name is taken
            Err(e) => match e.raw_response().map(|r| r.status().as_u16()) {
                Some(404) => Ok(false),
                Some(301) | Some(403) => Ok(true),
                _ => Err(StorageError::ConnectionError(format!(
                    "Head bucket {} failed: {}",
                    bucket,
                    DisplayErrorContext(&e)
                ))),
            },
        }
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(e) => match e.raw_response().map(|r| r.status().as_u16()) {
                Some(404) => Ok(false),
                _ => Err(StorageError::ConnectionError(format!(
                    "Head object {} in {} failed: {}",
                    key,
                    bucket,
                    DisplayErrorContext(&e)
                ))),
            },
        }
    }

    async fn list_keys(&self, bucket: &str) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                StorageError::ConnectionError(format!(
                    "List objects in {} failed: {}",
                    bucket,
                    DisplayErrorContext(&e)
                ))
            })?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }
        Ok(keys)
    }
}

impl Debug for SdkBucketControl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SdkBucketControl(region={:?})",
            self.client.config().region()
        )
    }
}

/// S3-compatible bucket backend.
pub struct S3Backend {
    config: S3Config,
    control: Arc<dyn BucketControl>,
    data: ObjectStoreClient,
    listing: ContentListing,
    span: Span,
}

impl S3Backend {
    /// Validate the configuration and build the SDK and data clients.
    ///
    /// # Errors
    ///
    /// `ConfigError` for a missing bucket name or incomplete keys.
    pub async fn new(config: S3Config, span: Span) -> StorageResult<Self> {
        config.validate()?;
        let data = ObjectStoreClient::for_s3(&config)?;
        let control = Arc::new(SdkBucketControl::new(&config).await);
        Ok(Self::from_parts(config, control, data, span))
    }

    pub fn from_parts(
        config: S3Config,
        control: Arc<dyn BucketControl>,
        data: ObjectStoreClient,
        span: Span,
    ) -> Self {
        debug!(
            parent: &span,
            "S3 backend for {} in {}", config.bucket, config.region
        );
        Self {
            config,
            control,
            data,
            listing: ContentListing::default(),
            span,
        }
    }

    pub fn config(&self) -> &S3Config {
        &self.config
    }
}

#[async_trait]
impl CloudStorage for S3Backend {
    fn name(&self) -> &str {
        &self.config.bucket
    }

    fn listing(&self) -> &ContentListing {
        &self.listing
    }

    async fn create(&self) -> StorageResult<()> {
        let bucket = &self.config.bucket;
        match self
            .control
            .create_bucket(bucket, &self.config.region)
            .await
        {
            Ok(()) => {
                info!(
                    parent: &self.span,
                    "Created bucket {} in {}", bucket, self.config.region
                );
                Ok(())
            }
            Err(e) => {
                info!(parent: &self.span, "Failed to create bucket {}: {}", bucket, e);
                match e {
                    StorageError::ResourceCreationError { .. } => Err(e),
                    other => Err(StorageError::creation(bucket, other)),
                }
            }
        }
    }

    async fn is_exist(&self) -> StorageResult<()> {
        let bucket = &self.config.bucket;
        if poll_until(self.config.poll, bucket, || {
            self.control.bucket_exists(bucket)
        })
        .await?
        {
            Ok(())
        } else {
            Err(StorageError::ResourceUnavailable(bucket.clone()))
        }
    }

    async fn is_object_exist(&self, key: &str) -> StorageResult<()> {
        let bucket = &self.config.bucket;
        if poll_until(self.config.poll, key, || {
            self.control.object_exists(bucket, key)
        })
        .await?
        {
            Ok(())
        } else {
            Err(StorageError::not_found(bucket, key))
        }
    }

    /// Keys come from ListObjectsV2 so that names the data client cannot
    /// address (folder markers such as `dir/`, empty segments) are listed too.
    async fn initialize_content(&mut self) -> StorageResult<()> {
        let names = self.control.list_keys(&self.config.bucket).await?;
        debug!(
            parent: &self.span,
            "Listed {} objects in {}",
            names.len(),
            self.config.bucket
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
        self.data
            .put_multipart(file_obj, file_name, self.config.upload_part_size())
            .await
    }
}

impl Debug for S3Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "S3Backend(bucket={}, control={:?}, data={:?})",
            self.config.bucket, self.control, self.data
        )
    }
}
