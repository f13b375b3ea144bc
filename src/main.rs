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

use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::time::SystemTime;
use tracing::{info, info_span, Instrument};

use cloud_bucket::storage::CredentialsRecord;
use cloud_bucket::{CloudStorage, Credentials, StorageBackendFactory, StorageConfig};

/// `AWS_S3_BUCKET` or `AZURE_CONTAINER`
const PROVIDER_VAR: &str = "CLOUD_BUCKET_PROVIDER";
/// Bucket or container name
const RESOURCE_VAR: &str = "CLOUD_BUCKET_RESOURCE";
/// Persisted credentials record, e.g. `{"type":"KEY_SECRET_KEY_PAIR","value":"AKIA... secret"}`
const CREDENTIALS_VAR: &str = "CLOUD_BUCKET_CREDENTIALS";
/// Optional JSON object of extra options, e.g. `{"region":"eu-west-1"}`
const OPTIONS_VAR: &str = "CLOUD_BUCKET_OPTIONS";

fn required_var(name: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    env::var(name).map_err(|_| format!("Environment variable {} is not set", name).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let provider = required_var(PROVIDER_VAR)?;
    let resource = required_var(RESOURCE_VAR)?;
    let record: CredentialsRecord = serde_json::from_str(&required_var(CREDENTIALS_VAR)?)?;
    let options: HashMap<String, String> = match env::var(OPTIONS_VAR) {
        Ok(raw) => serde_json::from_str(&raw)?,
        Err(_) => HashMap::new(),
    };

    let credentials = Credentials::from_record(&record)?;
    let config = StorageConfig::new(&provider)?
        .with_resource_name(&resource)
        .with_credentials(&credentials)
        .with_options(options);

    let span = info_span!("cloud_bucket", provider = %provider, resource = %resource);
    async move {
        info!("Starting Cloud Bucket");
        let start_time = SystemTime::now();

        let mut storage = StorageBackendFactory::from_config(config).await?;
        storage.is_exist().await?;
        storage.initialize_content().await?;

        for name in storage.content() {
            println!("{}", name);
        }
        info!(
            "Listed {} objects in {}ms",
            storage.len(),
            start_time.elapsed()?.as_millis()
        );
        Ok::<(), Box<dyn Error + Send + Sync>>(())
    }
    .instrument(span)
    .await
}
