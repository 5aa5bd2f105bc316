//! Value decoding: parameter values into secret payloads.
//!
//! Three policies are supported, selected per run:
//!
//! * `Plain` — the raw value under a single data key named after the
//!   derived name.
//! * `Split` — the derived name is `<secret>_<key>`; the value lands under
//!   `<key>` in a secret named `<secret>`.
//! * `JsonMap` — the value is a JSON object of string keys; each value is
//!   base64-decoded when it parses as base64 and taken as raw UTF-8 bytes
//!   otherwise.

use std::collections::BTreeMap;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::descriptor::ParameterDescriptor;
use crate::error::{Error, Result};

/// Label attached to every secret this tool manages.
pub const HERITAGE_LABEL: &str = "heritage";
pub const HERITAGE_VALUE: &str = "param-secret-sync";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    Plain,
    Split,
    #[default]
    JsonMap,
}

impl FromStr for DecodePolicy {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        match input {
            "plain" => Ok(Self::Plain),
            "split" => Ok(Self::Split),
            "json" => Ok(Self::JsonMap),
            other => Err(Error::InvalidDescriptor(format!(
                "unknown decode policy `{other}` (expected plain, split or json)"
            ))),
        }
    }
}

/// One secret ready to be written, no lifecycle after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPayload {
    pub name: String,
    pub namespace: String,
    pub secret_type: String,
    pub data: BTreeMap<String, Vec<u8>>,
    pub labels: BTreeMap<String, String>,
}

impl SecretPayload {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        secret_type: impl Into<String>,
        data: BTreeMap<String, Vec<u8>>,
    ) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(HERITAGE_LABEL.to_string(), HERITAGE_VALUE.to_string());
        Self {
            name: name.into(),
            namespace: namespace.into(),
            secret_type: secret_type.into(),
            data,
            labels,
        }
    }
}

/// Decodes one fetched value into a payload under the given policy.
pub fn decode(
    policy: DecodePolicy,
    descriptor: &ParameterDescriptor,
    value: &str,
    namespace: &str,
) -> Result<SecretPayload> {
    let derived = descriptor.derived_name();
    if derived.is_empty() {
        return Err(Error::EmptyDerivedName {
            parameter: descriptor.full_path.clone(),
        });
    }

    match policy {
        DecodePolicy::Plain => {
            let mut data = BTreeMap::new();
            data.insert(derived.to_string(), value.as_bytes().to_vec());
            Ok(SecretPayload::new(
                derived,
                namespace,
                &descriptor.secret_type,
                data,
            ))
        }
        DecodePolicy::Split => {
            let (name, key) = derived.split_once('_').ok_or_else(|| {
                Error::MissingSplitSeparator {
                    derived: derived.to_string(),
                }
            })?;
            if name.is_empty() {
                return Err(Error::EmptySplitSegment {
                    field: "secret name",
                    derived: derived.to_string(),
                });
            }
            if key.is_empty() {
                return Err(Error::EmptySplitSegment {
                    field: "data key",
                    derived: derived.to_string(),
                });
            }
            let mut data = BTreeMap::new();
            data.insert(key.to_string(), value.as_bytes().to_vec());
            Ok(SecretPayload::new(
                name,
                namespace,
                &descriptor.secret_type,
                data,
            ))
        }
        DecodePolicy::JsonMap => {
            let map: BTreeMap<String, String> =
                serde_json::from_str(value).map_err(|err| Error::InvalidJson {
                    parameter: descriptor.full_path.clone(),
                    message: err.to_string(),
                })?;
            let data = map
                .into_iter()
                .map(|(key, encoded)| (key, to_bytes(&encoded)))
                .collect();
            Ok(SecretPayload::new(
                derived,
                namespace,
                &descriptor.secret_type,
                data,
            ))
        }
    }
}

// Values are usually base64 per the JSON byte-map convention, but plain
// strings show up in hand-written parameters. Fall back to raw bytes.
fn to_bytes(encoded: &str) -> Vec<u8> {
    match STANDARD.decode(encoded.as_bytes()) {
        Ok(bytes) => bytes,
        Err(_) => encoded.as_bytes().to_vec(),
    }
}
