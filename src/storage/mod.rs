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

//! Cloud storage abstraction layer
//!
//! This module provides a single interface over an S3-compatible bucket and
//! an Azure Blob container. Object listing and transfers go through the
//! `object_store` crate for both providers; provisioning and existence checks
//! use the provider control planes (`aws-sdk-s3` for S3, the Blob service REST
//! API for Azure).

pub mod azure;
pub mod azure_rest;
pub mod config;
pub mod credentials;
pub mod error;
pub mod factory;
pub mod object_store;
pub mod provider;
pub mod s3;

// Public exports
pub use azure::AzureBlobBackend;
pub use config::{AzureConfig, CloudProvider, ConnectionDetails, S3Config, StorageConfig};
pub use credentials::{Credentials, CredentialsPatch, CredentialsRecord, CredentialsType};
pub use error::{StorageError, StorageResult};
pub use factory::{StorageBackend, StorageBackendFactory};
pub use provider::{CloudStorage, ContentListing};
pub use s3::S3Backend;
