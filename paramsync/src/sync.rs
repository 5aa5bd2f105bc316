//! The sync pipeline: fetch, decode, write. Fully sequential, first error
//! aborts the run and leaves earlier writes in place.

use std::collections::BTreeMap;

use paramsync_core::{decode, ParameterDescriptor, Result, SecretPayload};
use tracing::info;

use crate::config::SyncConfig;
use crate::fetch::ParameterSource;
use crate::store::{apply, SecretStore};

/// Runs the whole batch. Returns the number of secrets written.
pub async fn run(
    config: &SyncConfig,
    source: &dyn ParameterSource,
    store: &dyn SecretStore,
) -> Result<usize> {
    if config.descriptors.is_empty() {
        return Err(paramsync_core::Error::NoParameters);
    }

    let fetched = source.fetch(&config.parameter_names()).await?;
    for parameter in &fetched {
        info!(name = %parameter.name, value = %parameter.value, "returned value");
    }

    // Keyed by derived secret name: a later parameter resolving to the same
    // name overwrites the earlier payload.
    let mut payloads: BTreeMap<String, SecretPayload> = BTreeMap::new();
    for parameter in &fetched {
        let descriptor = config
            .descriptors
            .iter()
            .find(|d| d.full_path == parameter.name)
            .cloned()
            .unwrap_or_else(|| {
                ParameterDescriptor::new(&parameter.name, &config.default_secret_type)
            });
        let payload = decode(
            config.policy,
            &descriptor,
            &parameter.value,
            &config.namespace,
        )?;
        payloads.insert(payload.name.clone(), payload);
    }

    for payload in payloads.values() {
        let outcome = apply(store, payload, config.conflict).await?;
        info!(
            secret = %payload.name,
            namespace = %payload.namespace,
            outcome = ?outcome,
            "secret written"
        );
    }
    Ok(payloads.len())
}
