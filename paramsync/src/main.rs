use std::process;

use anyhow::Context;
use clap::Parser;
use paramsync::config::{resolve_kubeconfig, Cli, SyncConfig};
use paramsync::fetch::SsmParameterSource;
use paramsync::store::{kube_client, KubeSecretStore};
use paramsync::{sync, telemetry};
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(err) = real_main().await {
        eprintln!("paramsync exited with error: {err:#}");
        process::exit(1);
    }
}

async fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init()?;

    // Config errors must surface before either client is built.
    let config = SyncConfig::from_cli(&cli)?;
    info!(
        parameters = config.descriptors.len(),
        namespace = %config.namespace,
        policy = ?config.policy,
        on_conflict = ?config.conflict,
        "starting sync"
    );

    let source = SsmParameterSource::from_env().await;
    let client = kube_client(resolve_kubeconfig(cli.kubeconfig.clone()).as_deref())
        .await
        .context("error creating client")?;
    let store = KubeSecretStore::new(client, &config.namespace);

    let written = sync::run(&config, &source, &store).await?;
    info!(secrets = written, "sync complete");
    Ok(())
}
