//! Parameter descriptors and name derivation.
//!
//! A descriptor names one SSM parameter to sync, with an optional
//! per-parameter Kubernetes secret type (`/path/to/param:kubernetes.io/tls`).
//! The derived secret name is the path segment after the last `/`.

use crate::error::{Error, Result};

/// Secret type applied when neither the descriptor nor the CLI overrides it.
pub const DEFAULT_SECRET_TYPE: &str = "Opaque";

/// One requested parameter, immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub full_path: String,
    pub secret_type: String,
}

impl ParameterDescriptor {
    pub fn new(full_path: impl Into<String>, secret_type: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
            secret_type: secret_type.into(),
        }
    }

    /// Parses the repeatable `name[:type]` CLI form. The type falls back to
    /// `default_type` when the suffix is absent.
    pub fn parse(input: &str, default_type: &str) -> Result<Self> {
        let (name, secret_type) = match input.split_once(':') {
            Some((name, ty)) => (name.trim(), ty.trim()),
            None => (input.trim(), default_type),
        };
        if name.is_empty() {
            return Err(Error::InvalidDescriptor(input.to_string()));
        }
        if secret_type.is_empty() {
            return Err(Error::InvalidDescriptor(input.to_string()));
        }
        Ok(Self::new(name, secret_type))
    }

    pub fn derived_name(&self) -> &str {
        derived_name(&self.full_path)
    }
}

/// One (name, value) pair returned by the parameter store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedParameter {
    pub name: String,
    pub value: String,
}

/// The path segment after the last `/` of a parameter name.
pub fn derived_name(full_path: &str) -> &str {
    match full_path.rsplit_once('/') {
        Some((_, tail)) => tail,
        None => full_path,
    }
}
