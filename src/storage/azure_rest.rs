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

//! Container-level Blob service REST calls (create, delete, get properties).
//!
//! `object_store` only covers blobs, so provisioning a container is done
//! here. Requests are authorized by `reqsign`'s Azure Storage signer, either
//! with the SAS token appended to the query string or with a SharedKey
//! signature.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqsign::{AzureStorageCredential, AzureStorageSigner};
use reqwest::{Client, Method, Request, Response, StatusCode};
use std::fmt::{Debug, Formatter};
use std::time::Duration;
use url::Url;

use super::azure::{ContainerControl, CreateOutcome};
use super::config::{AzureConfig, AzureCredential};
use super::error::{StorageError, StorageResult};

/// Blob service REST version sent with every request
pub const API_VERSION: &str = "2021-08-06";

const ERROR_CODE_HEADER: &str = "x-ms-error-code";

/// REST client bound to one container
pub struct ContainerRestClient {
    http: Client,
    container_name: String,
    container_url: Url,
    signer: AzureStorageSigner,
    credential: AzureStorageCredential,
}

impl ContainerRestClient {
    /// # Errors
    ///
    /// `ConfigError` if the account key is not valid base64 or the account URL
    /// cannot be parsed.
    pub fn new(config: &AzureConfig) -> StorageResult<Self> {
        let credential = match config.credential()? {
            AzureCredential::SasToken(token) => AzureStorageCredential::SharedAccessSignature(
                token.trim_start_matches('?').to_string(),
            ),
            AzureCredential::AccessKey(key) => {
                // the signer decodes lazily, reject a bad key up front
                STANDARD.decode(key.trim()).map_err(|e| {
                    StorageError::ConfigError(format!("Account access key is not valid base64: {}", e))
                })?;
                AzureStorageCredential::SharedKey(
                    config.account_name.clone(),
                    key.trim().to_string(),
                )
            }
        };

        let container_url = Url::parse(&format!(
            "{}/{}",
            config.account_url(),
            config.container_name
        ))?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(sec) = config
            .options
            .get("timeout")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|sec| *sec > 0)
        {
            builder = builder.timeout(Duration::from_secs(sec));
        }
        if let Some(sec) = config
            .options
            .get("connect_timeout")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|sec| *sec > 0)
        {
            builder = builder.connect_timeout(Duration::from_secs(sec));
        }

        Ok(Self {
            http: builder.build()?,
            container_name: config.container_name.clone(),
            container_url,
            signer: AzureStorageSigner::new(),
            credential,
        })
    }

    /// Build an authorized `restype=container` request.
    ///
    /// Content-Length is left to the HTTP client, so an empty PUT is signed
    /// with an empty Content-Length line.
    fn request(&self, method: Method, metadata: &[(&str, &str)]) -> StorageResult<Request> {
        let mut url = self.container_url.clone();
        url.set_query(Some("restype=container"));

        let mut builder = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .header("x-ms-version", API_VERSION);
        for (name, value) in metadata {
            builder = builder.header(format!("x-ms-meta-{}", name.to_lowercase()), *value);
        }
        let mut unsigned = builder
            .body(())
            .map_err(|e| StorageError::ConfigError(format!("Invalid container request: {}", e)))?;

        self.sign(&mut unsigned)?;
        let (parts, ()) = unsigned.into_parts();
        let request = http::Request::from_parts(parts, Vec::<u8>::new());
        Ok(Request::try_from(request)?)
    }

    fn sign(&self, request: &mut http::Request<()>) -> StorageResult<()> {
        self.signer
            .sign(request, &self.credential)
            .map_err(|e| StorageError::CredentialsError(format!("Failed to sign request: {}", e)))
    }

    async fn send(&self, method: Method, metadata: &[(&str, &str)]) -> StorageResult<Response> {
        let request = self.request(method, metadata)?;
        Ok(self.http.execute(request).await?)
    }

    fn failure(&self, action: &str, response: &Response) -> StorageError {
        StorageError::ConnectionError(format!(
            "{} container {} failed: {} ({})",
            action,
            self.container_name,
            response.status(),
            error_code(response).unwrap_or("unknown")
        ))
    }
}

#[async_trait]
impl ContainerControl for ContainerRestClient {
    async fn create_container(&self, metadata: &[(&str, &str)]) -> StorageResult<CreateOutcome> {
        // no x-ms-blob-public-access header: the container stays private
        let response = self.send(Method::PUT, metadata).await?;
        match response.status() {
            StatusCode::CREATED => Ok(CreateOutcome::Created),
            StatusCode::CONFLICT => match error_code(&response) {
                Some("ContainerAlreadyExists") => Ok(CreateOutcome::AlreadyExists),
                Some("ContainerBeingDeleted") => Ok(CreateOutcome::BeingDeleted),
                _ => Err(self.failure("Create", &response)),
            },
            _ => Err(self.failure("Create", &response)),
        }
    }

    async fn delete_container(&self) -> StorageResult<()> {
        let response = self.send(Method::DELETE, &[]).await?;
        match response.status() {
            StatusCode::ACCEPTED | StatusCode::OK => Ok(()),
            _ => Err(self.failure("Delete", &response)),
        }
    }

    async fn container_exists(&self) -> StorageResult<bool> {
        let response = self.send(Method::GET, &[]).await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(self.failure("Get properties of", &response)),
        }
    }
}

impl Debug for ContainerRestClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let scheme = match self.credential {
            AzureStorageCredential::SharedKey(..) => "shared_key",
            _ => "sas",
        };
        write!(
            f,
            "ContainerRestClient(url={}, authorization={})",
            self.container_url, scheme
        )
    }
}

fn error_code(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(ERROR_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
}
