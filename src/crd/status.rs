//! # EtcdProxy Status

use serde::{Deserialize, Serialize};

/// Observed state of an `EtcdProxy`.
///
/// No fields are populated yet; the subresource exists so status can be added
/// without changing the CRD scope or subresources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EtcdProxyStatus {}
