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

//! # Cloud Bucket
//!
//! A Rust library giving one interface to object storage buckets across cloud
//! providers: S3-compatible buckets and Azure Blob containers.
//!
//! ## Features
//!
//! - **Provisioning**: create a private bucket/container, confirm it exists
//!   within a bounded poll
//! - **Content listing**: list every object once and answer membership and
//!   size queries from the cached listing
//! - **Transfers**: parallel ranged downloads, multipart (S3) or single-call
//!   (Azure) uploads
//! - **Credentials codec**: encode/decode credentials to the persisted
//!   `{type, value}` form
//!
//! ## Quick Start
//!
//! ### AWS S3 Example
//!
//! ```rust,no_run
//! use cloud_bucket::{CloudStorage, Credentials, StorageBackendFactory, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let credentials = Credentials::key_secret_key_pair("ACCESS_KEY", "SECRET_KEY");
//! let config = StorageConfig::aws_s3()
//!     .with_resource_name("my-bucket")
//!     .with_credentials(&credentials)
//!     .with_option("region", "eu-west-1");
//!
//! let mut bucket = StorageBackendFactory::from_config(config).await?;
//! bucket.is_exist().await?;
//! bucket.initialize_content().await?;
//! for name in bucket.content() {
//!     println!("{}", name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Azure Blob Example
//!
//! ```rust,no_run
//! use cloud_bucket::{CloudStorage, Credentials, StorageBackendFactory, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! // key is the account name, the token is a SAS token
//! let credentials = Credentials::key_token_pair("myaccount", "sv=2022-11-02&sig=...");
//! let config = StorageConfig::azure_container()
//!     .with_resource_name("my-container")
//!     .with_credentials(&credentials)
//!     .with_option("existence_probe", "properties");
//!
//! let container = StorageBackendFactory::from_config(config).await?;
//! container.download_file("report.csv", "/tmp/report.csv".as_ref()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`storage`] - Backends, factory, configuration and credentials
//! - [`util`] - Utility functions and helpers

pub mod storage;
pub mod util;

// Re-export commonly used types
pub use storage::{
    CloudStorage, Credentials, StorageBackend, StorageBackendFactory, StorageConfig, StorageError,
};
