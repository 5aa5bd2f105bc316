//! In-memory stand-ins for the parameter store and the secret store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use paramsync::fetch::ParameterSource;
use paramsync::store::{SecretStore, StoreError};
use paramsync_core::{Error, FetchedParameter, Result, SecretPayload};

/// Serves a fixed set of parameters and counts fetch calls. Names that were
/// never seeded behave like SSM's `invalid_parameters` list.
pub struct MemorySource {
    parameters: Vec<FetchedParameter>,
    pub calls: Mutex<usize>,
}

impl MemorySource {
    pub fn new(parameters: Vec<(&str, &str)>) -> Self {
        Self {
            parameters: parameters
                .into_iter()
                .map(|(name, value)| FetchedParameter {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ParameterSource for MemorySource {
    async fn fetch(&self, names: &[String]) -> Result<Vec<FetchedParameter>> {
        *self.calls.lock().unwrap() += 1;
        let missing: Vec<&str> = names
            .iter()
            .filter(|name| !self.parameters.iter().any(|p| &p.name == *name))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(Error::UnreadableParameters(missing.join(", ")));
        }
        Ok(self
            .parameters
            .iter()
            .filter(|p| names.contains(&p.name))
            .cloned()
            .collect())
    }
}

/// Namespaced in-memory secret store with kube-like conflict semantics.
pub struct MemoryStore {
    pub secrets: Mutex<BTreeMap<String, SecretPayload>>,
    pub events: Mutex<Vec<String>>,
    /// Secret name whose create always fails with a non-conflict error.
    pub poisoned: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            secrets: Mutex::new(BTreeMap::new()),
            events: Mutex::new(Vec::new()),
            poisoned: None,
        }
    }

    pub fn poisoned(name: &str) -> Self {
        Self {
            poisoned: Some(name.to_string()),
            ..Self::new()
        }
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn create(&self, payload: &SecretPayload) -> std::result::Result<(), StoreError> {
        if self.poisoned.as_deref() == Some(payload.name.as_str()) {
            return Err(StoreError::Api("injected api failure".to_string()));
        }
        let mut secrets = self.secrets.lock().unwrap();
        if secrets.contains_key(&payload.name) {
            return Err(StoreError::AlreadyExists);
        }
        self.record(format!("create {}", payload.name));
        secrets.insert(payload.name.clone(), payload.clone());
        Ok(())
    }

    async fn replace(&self, payload: &SecretPayload) -> std::result::Result<(), StoreError> {
        let mut secrets = self.secrets.lock().unwrap();
        if !secrets.contains_key(&payload.name) {
            return Err(StoreError::NotFound);
        }
        self.record(format!("replace {}", payload.name));
        secrets.insert(payload.name.clone(), payload.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> std::result::Result<(), StoreError> {
        let mut secrets = self.secrets.lock().unwrap();
        if secrets.remove(name).is_none() {
            return Err(StoreError::NotFound);
        }
        self.record(format!("delete {name}"));
        Ok(())
    }
}
