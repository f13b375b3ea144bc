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

//! Credential model and its persisted form.
//!
//! A cloud storage is authorized by one of three credential shapes. All of
//! them are stored as a single `{type, value}` record, where the two-field
//! shapes join their fields with a space.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::error::{StorageError, StorageResult};

/// Which credential fields are authoritative
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialsType {
    /// Bearer/SAS token only (`session_token`)
    Token,
    /// `key` + `session_token`
    KeyTokenPair,
    /// `key` + `secret_key`
    KeySecretKeyPair,
}

impl CredentialsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialsType::Token => "TOKEN",
            CredentialsType::KeyTokenPair => "KEY_TOKEN_PAIR",
            CredentialsType::KeySecretKeyPair => "KEY_SECRET_KEY_PAIR",
        }
    }
}

/// Persisted credentials: the discriminator plus the serialized value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialsRecord {
    #[serde(rename = "type")]
    pub credentials_type: CredentialsType,
    pub value: String,
}

impl CredentialsRecord {
    pub fn new(credentials_type: CredentialsType, value: impl Into<String>) -> Self {
        Self {
            credentials_type,
            value: value.into(),
        }
    }
}

/// Partial update applied by [`Credentials::mapping_with_new_values`].
///
/// `None` means "keep the current value".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsPatch {
    pub key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub credentials_type: Option<CredentialsType>,
}

/// Credentials of a cloud storage.
///
/// Deserializes from a raw field bag (request body, database row) where
/// every field is optional; missing string fields become empty.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    pub key: String,
    pub secret_key: String,
    pub session_token: String,
    pub credentials_type: Option<CredentialsType>,
}

impl Credentials {
    pub fn token(session_token: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
            credentials_type: Some(CredentialsType::Token),
            ..Default::default()
        }
    }

    pub fn key_token_pair(key: impl Into<String>, session_token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            session_token: session_token.into(),
            credentials_type: Some(CredentialsType::KeyTokenPair),
            ..Default::default()
        }
    }

    pub fn key_secret_key_pair(key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret_key: secret_key.into(),
            credentials_type: Some(CredentialsType::KeySecretKeyPair),
            ..Default::default()
        }
    }

    /// Build credentials from a persisted record.
    pub fn from_record(record: &CredentialsRecord) -> StorageResult<Self> {
        let mut credentials = Self::default();
        credentials.convert_from_db(record)?;
        Ok(credentials)
    }

    /// Serialize the fields selected by `credentials_type` into the stored value.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError` if `credentials_type` is unset.
    pub fn convert_to_db(&self) -> StorageResult<String> {
        let credentials_type = self.credentials_type.ok_or_else(missing_type)?;

        Ok(match credentials_type {
            CredentialsType::Token => self.session_token.clone(),
            CredentialsType::KeyTokenPair => format!("{} {}", self.key, self.session_token),
            CredentialsType::KeySecretKeyPair => format!("{} {}", self.key, self.secret_key),
        })
    }

    /// Same as [`convert_to_db`](Self::convert_to_db) but keeps the discriminator alongside.
    pub fn to_record(&self) -> StorageResult<CredentialsRecord> {
        match self.credentials_type {
            Some(credentials_type) => Ok(CredentialsRecord::new(
                credentials_type,
                self.convert_to_db()?,
            )),
            None => Err(missing_type()),
        }
    }

    /// Load fields from a persisted `{type, value}` record.
    ///
    /// Two-field values must split on whitespace into exactly two tokens.
    /// Fields not covered by the record's type are left untouched.
    pub fn convert_from_db(&mut self, record: &CredentialsRecord) -> StorageResult<()> {
        if record.credentials_type == CredentialsType::Token {
            self.credentials_type = Some(CredentialsType::Token);
            self.session_token = record.value.clone();
            return Ok(());
        }

        let mut parts = record.value.split_whitespace();
        let (key, second) = match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(second), None) => (key.to_string(), second.to_string()),
            _ => {
                return Err(StorageError::CredentialsError(format!(
                    "{} value must consist of exactly two whitespace-separated fields",
                    record.credentials_type.as_str()
                )))
            }
        };

        self.credentials_type = Some(record.credentials_type);
        self.key = key;
        if record.credentials_type == CredentialsType::KeyTokenPair {
            self.session_token = second;
        } else {
            self.secret_key = second;
        }
        Ok(())
    }

    /// Override fields present in `patch`, keep the others.
    pub fn mapping_with_new_values(&mut self, patch: CredentialsPatch) {
        if let Some(credentials_type) = patch.credentials_type {
            self.credentials_type = Some(credentials_type);
        }
        if let Some(key) = patch.key {
            self.key = key;
        }
        if let Some(secret_key) = patch.secret_key {
            self.secret_key = secret_key;
        }
        if let Some(session_token) = patch.session_token {
            self.session_token = session_token;
        }
    }

    /// `[key, secret_key, session_token]`
    pub fn values(&self) -> [&str; 3] {
        [&self.key, &self.secret_key, &self.session_token]
    }
}

fn missing_type() -> StorageError {
    StorageError::CredentialsError("Credentials type is not set".to_string())
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() {
                ""
            } else {
                "***"
            }
        }

        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret_key", &redact(&self.secret_key))
            .field("session_token", &redact(&self.session_token))
            .field("credentials_type", &self.credentials_type)
            .finish()
    }
}
