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

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// A required construction field is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The bucket/container could not be provisioned (already exists, permission denied).
    #[error("Failed to create resource {resource}: {reason}")]
    ResourceCreationError { resource: String, reason: String },

    /// The existence poll ran out of attempts without confirmation.
    #[error("A resource {0} unavailable")]
    ResourceUnavailable(String),

    #[error("Object {key} not found in {resource}")]
    ObjectNotFound { resource: String, key: String },

    /// The name cannot be stored verbatim by the provider client.
    #[error("Invalid object name {key:?}: {reason}")]
    InvalidObjectName { key: String, reason: String },

    #[error("Unsupported cloud provider: {0}")]
    UnsupportedProvider(String),

    #[error("Credentials error: {0}")]
    CredentialsError(String),

    /// Transport or provider SDK failure, message names the affected resource.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
}

impl StorageError {
    pub(crate) fn creation(resource: impl Into<String>, reason: impl ToString) -> Self {
        StorageError::ResourceCreationError {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn not_found(resource: impl Into<String>, key: impl Into<String>) -> Self {
        StorageError::ObjectNotFound {
            resource: resource.into(),
            key: key.into(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_error() {
        let error = StorageError::ConfigError("Bucket name was not found".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: Bucket name was not found"
        );
    }

    #[test]
    fn test_resource_creation_error_names_resource() {
        let error = StorageError::creation("my-bucket", "BucketAlreadyExists");
        assert_eq!(
            error.to_string(),
            "Failed to create resource my-bucket: BucketAlreadyExists"
        );
    }

    #[test]
    fn test_resource_unavailable() {
        let error = StorageError::ResourceUnavailable("my-container".to_string());
        assert_eq!(error.to_string(), "A resource my-container unavailable");
    }

    #[test]
    fn test_object_not_found() {
        let error = StorageError::not_found("my-bucket", "images/1.png");
        assert!(error.to_string().contains("images/1.png"));
        assert!(error.to_string().contains("my-bucket"));
    }

    #[test]
    fn test_invalid_object_name() {
        let error = StorageError::InvalidObjectName {
            key: "dir/".to_string(),
            reason: "trailing '/'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid object name \"dir/\": trailing '/'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let storage_error: StorageError = io_error.into();

        match storage_error {
            StorageError::IoError(_) => {
                assert!(storage_error.to_string().contains("IO error"));
            }
            _ => panic!("Expected IoError variant"),
        }
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let url_error = url::ParseError::EmptyHost;
        let storage_error: StorageError = url_error.into();

        match storage_error {
            StorageError::UrlParseError(_) => {
                assert!(storage_error.to_string().contains("URL parse error"));
            }
            _ => panic!("Expected UrlParseError variant"),
        }
    }

    #[test]
    fn test_error_debug() {
        let error = StorageError::UnsupportedProvider("GOOGLE_DRIVE".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("UnsupportedProvider"));
    }
}
