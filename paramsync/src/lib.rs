//! One-shot batch sync of AWS SSM Parameter Store values into Kubernetes
//! secrets. The pipeline is a single linear pass: resolve config, fetch all
//! parameters in one decrypting call, decode each value into a secret
//! payload, create-or-update the secrets sequentially.

pub mod config;
pub mod fetch;
pub mod store;
pub mod sync;
pub mod telemetry;
