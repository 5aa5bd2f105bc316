//! Core model for syncing parameter-store values into cluster secrets:
//! parameter descriptors, decode policies and the secret payload shape.
//! No cloud or cluster clients live here; those sit in the `paramsync`
//! binary behind trait seams.

pub mod decode;
pub mod descriptor;
pub mod error;

pub use decode::{decode, DecodePolicy, SecretPayload, HERITAGE_LABEL, HERITAGE_VALUE};
pub use descriptor::{derived_name, FetchedParameter, ParameterDescriptor, DEFAULT_SECRET_TYPE};
pub use error::{Error, Result};
