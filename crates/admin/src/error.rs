//! JSON-RPC level failures.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
/// Any failure reported by the admin service or its collaborators.
pub const SERVER_ERROR: i32 = -32000;

/// Why an admin request did not produce a reply.
#[derive(Debug, Error)]
pub enum RpcFailure {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("internal error: {0}")]
    Internal(String),
    /// Reported by a handler; message and kind pass through unchanged.
    #[error(transparent)]
    Admin(#[from] corelib::Error),
}

impl RpcFailure {
    pub fn code(&self) -> i32 {
        match self {
            RpcFailure::Parse(_) => PARSE_ERROR,
            RpcFailure::InvalidRequest(_) => INVALID_REQUEST,
            RpcFailure::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcFailure::InvalidParams(_) => INVALID_PARAMS,
            RpcFailure::Internal(_) => INTERNAL_ERROR,
            RpcFailure::Admin(_) => SERVER_ERROR,
        }
    }

    pub fn to_rpc_error(&self) -> RpcError {
        let data = match self {
            RpcFailure::Admin(err) => Some(json!({ "kind": err.kind() })),
            _ => None,
        };
        RpcError {
            code: self.code(),
            message: self.to_string(),
            data,
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
