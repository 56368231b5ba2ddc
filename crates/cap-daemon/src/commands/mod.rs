//! IPC command handlers.
//!
//! Each submodule implements the commands for one dashboard view.

pub mod cities;
pub mod inventory;
pub mod reports;
pub mod session;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::rpc::RpcError;

/// Handler return type.
pub type Result = std::result::Result<Value, RpcError>;

/// Required string parameter.
pub(crate) fn str_param<'a>(params: &'a Value, key: &str) -> std::result::Result<&'a str, RpcError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// Required structured parameter.
pub(crate) fn typed_param<T: DeserializeOwned>(
    params: &Value,
    key: &str,
) -> std::result::Result<T, RpcError> {
    let raw = params
        .get(key)
        .cloned()
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))?;
    serde_json::from_value(raw).map_err(|e| RpcError::invalid_params(&format!("{key}: {e}")))
}

/// Serialize a handler result.
pub(crate) fn to_value<T: serde::Serialize>(value: &T) -> Result {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error(&e.to_string()))
}
