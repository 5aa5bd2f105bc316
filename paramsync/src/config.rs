//! CLI surface and resolved run configuration.

use std::path::PathBuf;

use clap::Parser;
use paramsync_core::{DecodePolicy, Error, ParameterDescriptor, Result};

use crate::store::ConflictMode;

#[derive(Parser)]
#[command(
    name = "paramsync",
    version,
    about = "Sync AWS SSM parameters into Kubernetes secrets"
)]
pub struct Cli {
    /// Comma separated list of parameter names
    #[arg(long)]
    pub params: Option<String>,
    /// Single parameter as name[:secretType], repeatable
    #[arg(long = "param")]
    pub param: Vec<String>,
    /// Target namespace for the created secrets
    #[arg(long, default_value = "default")]
    pub namespace: String,
    /// Kubernetes secret type applied to parameters without an override
    #[arg(long = "type", default_value = "Opaque")]
    pub secret_type: String,
    /// Kubeconfig file (falls back to $KUBECONFIG, then in-cluster config)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,
    /// Value decoding policy: plain, split or json
    #[arg(long, default_value = "json")]
    pub decode: DecodePolicy,
    /// Handling of already existing secrets: update or recreate
    #[arg(long = "on-conflict", default_value = "update")]
    pub on_conflict: ConflictMode,
}

/// Everything the pipeline needs, resolved before any client is built.
#[derive(Debug)]
pub struct SyncConfig {
    pub descriptors: Vec<ParameterDescriptor>,
    pub namespace: String,
    pub default_secret_type: String,
    pub policy: DecodePolicy,
    pub conflict: ConflictMode,
}

impl SyncConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut descriptors = Vec::new();
        if let Some(list) = cli.params.as_deref() {
            for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                descriptors.push(ParameterDescriptor::new(name, &cli.secret_type));
            }
        }
        for raw in &cli.param {
            descriptors.push(ParameterDescriptor::parse(raw, &cli.secret_type)?);
        }
        if descriptors.is_empty() {
            return Err(Error::NoParameters);
        }
        Ok(Self {
            descriptors,
            namespace: cli.namespace.clone(),
            default_secret_type: cli.secret_type.clone(),
            policy: cli.decode,
            conflict: cli.on_conflict,
        })
    }

    pub fn parameter_names(&self) -> Vec<String> {
        self.descriptors
            .iter()
            .map(|d| d.full_path.clone())
            .collect()
    }
}

/// Kubeconfig path from the flag, then the `KUBECONFIG` env var. `None`
/// means the client falls through to default discovery and in-cluster config.
pub fn resolve_kubeconfig(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var_os("KUBECONFIG")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}
