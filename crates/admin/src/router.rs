//! Request router: method name → one typed handler.
//!
//! Requests are JSON-RPC 2.0 envelopes. Method names are the camelCase
//! operation names, optionally namespaced (`admin.getNodeVersion`). Params are
//! a single object, or a one-element array holding that object.

use crate::error::{RpcError, RpcFailure};
use crate::service::AdminService;
use corelib::Endpoint;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Namespace of the admin methods.
pub const NAMESPACE: &str = "admin";

/// Every operation the admin API exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdminMethod {
    GetNodeVersion,
    GetNodeId,
    GetNetworkId,
    GetNetworkName,
    GetBlockchainId,
    Peers,
    StartCpuProfiler,
    StopCpuProfiler,
    MemoryProfile,
    LockProfile,
    Alias,
    AliasChain,
    Stacktrace,
}

impl AdminMethod {
    pub const ALL: [AdminMethod; 13] = [
        AdminMethod::GetNodeVersion,
        AdminMethod::GetNodeId,
        AdminMethod::GetNetworkId,
        AdminMethod::GetNetworkName,
        AdminMethod::GetBlockchainId,
        AdminMethod::Peers,
        AdminMethod::StartCpuProfiler,
        AdminMethod::StopCpuProfiler,
        AdminMethod::MemoryProfile,
        AdminMethod::LockProfile,
        AdminMethod::Alias,
        AdminMethod::AliasChain,
        AdminMethod::Stacktrace,
    ];

    /// Wire name without the namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminMethod::GetNodeVersion => "getNodeVersion",
            AdminMethod::GetNodeId => "getNodeID",
            AdminMethod::GetNetworkId => "getNetworkID",
            AdminMethod::GetNetworkName => "getNetworkName",
            AdminMethod::GetBlockchainId => "getBlockchainID",
            AdminMethod::Peers => "peers",
            AdminMethod::StartCpuProfiler => "startCPUProfiler",
            AdminMethod::StopCpuProfiler => "stopCPUProfiler",
            AdminMethod::MemoryProfile => "memoryProfile",
            AdminMethod::LockProfile => "lockProfile",
            AdminMethod::Alias => "alias",
            AdminMethod::AliasChain => "aliasChain",
            AdminMethod::Stacktrace => "stacktrace",
        }
    }
}

impl fmt::Display for AdminMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NAMESPACE}.{}", self.as_str())
    }
}

impl FromStr for AdminMethod {
    type Err = RpcFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s
            .strip_prefix(NAMESPACE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(s);
        AdminMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == bare)
            .ok_or_else(|| RpcFailure::MethodNotFound(s.to_string()))
    }
}

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

impl RpcResponse {
    /// Creates a success response
    pub fn success(result: Value, id: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Creates an error response
    pub fn failure(failure: &RpcFailure, id: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(failure.to_rpc_error()),
            id,
        }
    }
}

/// Single entry point for admin requests.
#[derive(Clone)]
pub struct AdminRouter {
    service: Arc<AdminService>,
}

fn decode<T: DeserializeOwned>(params: Option<Value>) -> Result<T, RpcFailure> {
    let value = match params {
        Some(Value::Array(mut items)) if items.len() == 1 => items.remove(0),
        Some(Value::Null) | None => {
            return Err(RpcFailure::InvalidParams("missing params".to_string()))
        }
        Some(other) => other,
    };
    serde_json::from_value(value).map_err(|e| RpcFailure::InvalidParams(e.to_string()))
}

fn encode<T: Serialize>(reply: T) -> Result<Value, RpcFailure> {
    serde_json::to_value(reply).map_err(|e| RpcFailure::Internal(e.to_string()))
}

impl AdminRouter {
    pub fn new(service: Arc<AdminService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &AdminService {
        &self.service
    }

    /// Run one method. Params of no-argument methods are ignored.
    pub fn dispatch(&self, method: AdminMethod, params: Option<Value>) -> Result<Value, RpcFailure> {
        let svc = &self.service;
        match method {
            AdminMethod::GetNodeVersion => encode(svc.get_node_version()),
            AdminMethod::GetNodeId => encode(svc.get_node_id()),
            AdminMethod::GetNetworkId => encode(svc.get_network_id()),
            AdminMethod::GetNetworkName => encode(svc.get_network_name()),
            AdminMethod::GetBlockchainId => encode(svc.get_blockchain_id(&decode(params)?)?),
            AdminMethod::Peers => encode(svc.peers()),
            AdminMethod::StartCpuProfiler => encode(svc.start_cpu_profiler(&decode(params)?)?),
            AdminMethod::StopCpuProfiler => encode(svc.stop_cpu_profiler()?),
            AdminMethod::MemoryProfile => encode(svc.memory_profile(&decode(params)?)?),
            AdminMethod::LockProfile => encode(svc.lock_profile(&decode(params)?)?),
            AdminMethod::Alias => encode(svc.alias(&decode(params)?)?),
            AdminMethod::AliasChain => encode(svc.alias_chain(&decode(params)?)?),
            AdminMethod::Stacktrace => encode(svc.stacktrace()),
        }
    }

    /// Handle a decoded JSON-RPC envelope.
    ///
    /// Every request is answered, including notifications without an `id`;
    /// those get a response whose `id` is `null`.
    pub fn handle_request(&self, request: RpcRequest) -> RpcResponse {
        let RpcRequest {
            jsonrpc,
            method,
            params,
            id,
        } = request;

        if jsonrpc != "2.0" {
            let failure = RpcFailure::InvalidRequest(format!("unsupported jsonrpc version {jsonrpc:?}"));
            return RpcResponse::failure(&failure, id);
        }

        let outcome = method
            .parse::<AdminMethod>()
            .and_then(|m| self.dispatch(m, params));

        match outcome {
            Ok(result) => RpcResponse::success(result, id),
            Err(failure) => {
                warn!(%method, code = failure.code(), error = %failure, "admin call failed");
                RpcResponse::failure(&failure, id)
            }
        }
    }

    /// Handle a raw JSON body.
    ///
    /// Bodies that are not JSON get `-32700`; JSON that is not a request
    /// object gets `-32600`, echoing its `id` when there is one.
    pub fn handle_json(&self, body: &str) -> RpcResponse {
        let value = match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "unparseable admin request");
                return RpcResponse::failure(&RpcFailure::Parse(e.to_string()), None);
            }
        };

        let id = value.get("id").cloned();
        match serde_json::from_value::<RpcRequest>(value) {
            Ok(request) => self.handle_request(request),
            Err(e) => {
                debug!(error = %e, "malformed admin request");
                RpcResponse::failure(&RpcFailure::InvalidRequest(e.to_string()), id)
            }
        }
    }
}

impl Endpoint for AdminRouter {
    fn handle(&self, body: &str) -> String {
        let response = self.handle_json(body);
        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"jsonrpc":"2.0","error":{{"code":{},"message":"{}"}},"id":null}}"#,
                crate::error::INTERNAL_ERROR,
                e
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_roundtrip() {
        for method in AdminMethod::ALL {
            assert_eq!(method.to_string().parse::<AdminMethod>().unwrap(), method);
            assert_eq!(method.as_str().parse::<AdminMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_unknown_method() {
        let err = "admin.reboot".parse::<AdminMethod>().unwrap_err();
        assert_eq!(err.code(), crate::error::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_method_names_are_case_sensitive() {
        assert!("admin.GetNodeVersion".parse::<AdminMethod>().is_err());
        assert!("other.getNodeVersion".parse::<AdminMethod>().is_err());
    }

    #[test]
    fn test_decode_accepts_object_or_singleton_array() {
        use crate::types::AliasArgs;
        let obj = serde_json::json!({ "endpoint": "admin", "alias": "a" });
        let a: AliasArgs = decode(Some(obj.clone())).unwrap();
        let b: AliasArgs = decode(Some(Value::Array(vec![obj]))).unwrap();
        assert_eq!(a.alias, b.alias);

        let missing = decode::<AliasArgs>(None).unwrap_err();
        assert_eq!(missing.code(), crate::error::INVALID_PARAMS);
    }
}
