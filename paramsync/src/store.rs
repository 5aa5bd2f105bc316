//! Secret writer: the Kubernetes-backed store and the conflict state machine.
//!
//! Writes go through the [`SecretStore`] trait so the create/update/recreate
//! flow can be exercised against an in-memory store in tests. The only
//! recoverable condition is "already exists"; everything else aborts the run.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::{Api, DeleteParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use paramsync_core::{Error, Result, SecretPayload};
use thiserror::Error as ThisError;
use tracing::{info, warn};

/// How an existing secret with the same name is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictMode {
    /// Replace the live object in place. The secret type is immutable
    /// server-side, so a type change fails the run.
    #[default]
    Update,
    /// Delete then create again, accepting a brief window with no secret.
    Recreate,
}

impl FromStr for ConflictMode {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<Self, String> {
        match input {
            "update" => Ok(Self::Update),
            "recreate" => Ok(Self::Recreate),
            other => Err(format!(
                "unknown conflict mode `{other}` (expected update or recreate)"
            )),
        }
    }
}

/// Terminal success states of the per-secret state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Recreated,
}

/// Errors surfaced by a store implementation. `AlreadyExists` is the one
/// condition the writer recovers from.
#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("secret already exists")]
    AlreadyExists,
    #[error("secret not found")]
    NotFound,
    #[error("{0}")]
    Api(String),
}

#[async_trait]
pub trait SecretStore {
    async fn create(&self, payload: &SecretPayload) -> std::result::Result<(), StoreError>;
    async fn replace(&self, payload: &SecretPayload) -> std::result::Result<(), StoreError>;
    async fn delete(&self, name: &str) -> std::result::Result<(), StoreError>;
}

/// Runs one payload through the conflict state machine.
pub async fn apply(
    store: &dyn SecretStore,
    payload: &SecretPayload,
    mode: ConflictMode,
) -> Result<WriteOutcome> {
    info!(secret = %payload.name, namespace = %payload.namespace, "creating secret");
    match store.create(payload).await {
        Ok(()) => Ok(WriteOutcome::Created),
        Err(StoreError::AlreadyExists) => recover(store, payload, mode).await,
        Err(err) => Err(Error::Store(err.to_string())),
    }
}

async fn recover(
    store: &dyn SecretStore,
    payload: &SecretPayload,
    mode: ConflictMode,
) -> Result<WriteOutcome> {
    match mode {
        ConflictMode::Update => {
            warn!(
                secret = %payload.name,
                "secret already exists, updating in place (type is immutable server-side)"
            );
            store
                .replace(payload)
                .await
                .map_err(|err| Error::Store(err.to_string()))?;
            Ok(WriteOutcome::Updated)
        }
        ConflictMode::Recreate => {
            warn!(secret = %payload.name, "secret already exists, deleting and recreating");
            match store.delete(&payload.name).await {
                // Deleted out from under us between create and delete.
                Ok(()) | Err(StoreError::NotFound) => {}
                Err(err) => return Err(Error::Store(err.to_string())),
            }
            store
                .create(payload)
                .await
                .map_err(|err| Error::Store(err.to_string()))?;
            Ok(WriteOutcome::Recreated)
        }
    }
}

/// Kubernetes client from an explicit kubeconfig path, default kubeconfig
/// discovery or in-cluster config, in that order.
pub async fn kube_client(kubeconfig: Option<&Path>) -> anyhow::Result<Client> {
    let config = match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .with_context(|| format!("failed to read kubeconfig {}", path.display()))?;
            kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .context("failed to load kubeconfig")?
        }
        None => kube::Config::from_kubeconfig(&KubeConfigOptions::default())
            .await
            .or_else(|_| kube::Config::incluster())
            .context("no kubeconfig found and not running in-cluster")?,
    };
    Client::try_from(config).context("failed to build kubernetes client")
}

pub struct KubeSecretStore {
    api: Api<Secret>,
}

impl KubeSecretStore {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
        }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn create(&self, payload: &SecretPayload) -> std::result::Result<(), StoreError> {
        self.api
            .create(&PostParams::default(), &to_secret(payload))
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn replace(&self, payload: &SecretPayload) -> std::result::Result<(), StoreError> {
        let current = self.api.get(&payload.name).await.map_err(classify)?;
        let mut secret = to_secret(payload);
        secret.metadata.resource_version = current.metadata.resource_version;
        self.api
            .replace(&payload.name, &PostParams::default(), &secret)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> std::result::Result<(), StoreError> {
        self.api
            .delete(name, &DeleteParams::default())
            .await
            .map_err(classify)?;
        Ok(())
    }
}

fn classify(err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(response) if response.code == 409 => StoreError::AlreadyExists,
        kube::Error::Api(response) if response.code == 404 => StoreError::NotFound,
        other => StoreError::Api(other.to_string()),
    }
}

fn to_secret(payload: &SecretPayload) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(payload.name.clone()),
            namespace: Some(payload.namespace.clone()),
            labels: Some(payload.labels.clone()),
            ..ObjectMeta::default()
        },
        type_: Some(payload.secret_type.clone()),
        data: Some(
            payload
                .data
                .iter()
                .map(|(key, value)| (key.clone(), ByteString(value.clone())))
                .collect(),
        ),
        ..Secret::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn payload(name: &str) -> SecretPayload {
        let mut data = BTreeMap::new();
        data.insert("key".to_string(), b"value".to_vec());
        SecretPayload::new(name, "default", "Opaque", data)
    }

    #[test]
    fn secret_conversion_carries_metadata_and_data() {
        let secret = to_secret(&payload("db"));
        assert_eq!(secret.metadata.name.as_deref(), Some("db"));
        assert_eq!(secret.metadata.namespace.as_deref(), Some("default"));
        assert_eq!(secret.type_.as_deref(), Some("Opaque"));
        let labels = secret.metadata.labels.unwrap();
        assert_eq!(
            labels.get("heritage").map(String::as_str),
            Some("param-secret-sync")
        );
        let data = secret.data.unwrap();
        assert_eq!(data.get("key").unwrap().0, b"value");
    }

    #[test]
    fn conflict_mode_parsing() {
        assert_eq!(
            "update".parse::<ConflictMode>().unwrap(),
            ConflictMode::Update
        );
        assert_eq!(
            "recreate".parse::<ConflictMode>().unwrap(),
            ConflictMode::Recreate
        );
        assert!("merge".parse::<ConflictMode>().is_err());
    }

    #[test]
    #[ignore = "requires kubeconfig or in-cluster access"]
    fn kube_client_from_environment() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let _ = kube_client(None).await;
        });
    }
}
