//! Remote parameter fetch: one batched `GetParameters` call with decryption.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use paramsync_core::{Error, FetchedParameter, Result};
use tracing::info;

#[async_trait]
pub trait ParameterSource {
    /// Fetches all named parameters in one request, in API response order.
    async fn fetch(&self, names: &[String]) -> Result<Vec<FetchedParameter>>;
}

pub struct SsmParameterSource {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterSource {
    /// Client from the default credential/region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_ssm::Client::new(&config),
        }
    }
}

#[async_trait]
impl ParameterSource for SsmParameterSource {
    async fn fetch(&self, names: &[String]) -> Result<Vec<FetchedParameter>> {
        let output = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .with_decryption(true)
            .send()
            .await
            .map_err(|err| Error::Fetch(err.to_string()))?;

        // GetParameters reports unreadable names instead of failing the call.
        // There is no partial-result mode, so surface them as fatal.
        let invalid = output.invalid_parameters();
        if !invalid.is_empty() {
            return Err(Error::UnreadableParameters(invalid.join(", ")));
        }

        let mut fetched = Vec::with_capacity(output.parameters().len());
        for parameter in output.parameters() {
            let (Some(name), Some(value)) = (parameter.name(), parameter.value()) else {
                return Err(Error::Fetch(
                    "parameter response entry missing name or value".to_string(),
                ));
            };
            fetched.push(FetchedParameter {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        info!(count = fetched.len(), "fetched parameters");
        Ok(fetched)
    }
}
