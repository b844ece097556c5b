//! CLI subcommands.

use crate::node::{Node, ADMIN_PATH};
use clap::Subcommand;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::info;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve `<path> <json>` requests, one per line on stdin
    Serve,
    /// Send one admin request and print the reply
    Call {
        /// Method name, e.g. `admin.getNodeVersion`
        method: String,
        /// JSON params object
        params: Option<String>,
        /// Route path the request is sent to
        #[arg(long, default_value = ADMIN_PATH)]
        path: String,
    },
    /// Print the route table
    Routes,
}

/// What a command produced.
#[derive(Debug)]
pub enum CommandResult {
    Served { requests: u64 },
    Reply(String),
    Routes(Vec<(String, Option<String>)>),
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Served { requests } => write!(f, "served {requests} requests"),
            CommandResult::Reply(reply) => f.write_str(reply),
            CommandResult::Routes(routes) => {
                for (i, (path, target)) in routes.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    match target {
                        Some(target) => write!(f, "{path} -> {target}")?,
                        None => write!(f, "{path}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl Command {
    pub fn execute(self, node: Node) -> anyhow::Result<CommandResult> {
        match self {
            Command::Serve => {
                let runtime = tokio::runtime::Runtime::new()?;
                let requests = runtime.block_on(serve(Arc::new(node)))?;
                Ok(CommandResult::Served { requests })
            }
            Command::Call {
                method,
                params,
                path,
            } => {
                let params: Value = match params {
                    Some(text) => serde_json::from_str(&text)?,
                    None => Value::Null,
                };
                let body = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
                Ok(CommandResult::Reply(node.route(&path, &body.to_string())))
            }
            Command::Routes => Ok(CommandResult::Routes(node.routes.paths())),
        }
    }
}

/// Answer stdin request lines until EOF.
///
/// Lines are handled concurrently on the blocking pool; replies are written
/// as they complete, so their order may differ from the request order.
async fn serve(node: Arc<Node>) -> anyhow::Result<u64> {
    let (replies, mut outbox) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(reply) = outbox.recv().await {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut handlers = JoinSet::new();
    let mut requests = 0u64;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        requests += 1;
        let node = Arc::clone(&node);
        let replies = replies.clone();
        handlers.spawn_blocking(move || {
            // Receiver only closes once all senders are gone.
            let _ = replies.send(node.route_line(&line));
        });
    }

    while let Some(done) = handlers.join_next().await {
        done?;
    }
    drop(replies);
    writer.await??;

    info!(requests, "stdin closed");
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;

    #[test]
    fn test_call_get_network_name() {
        let node = Node::build(&NodeConfig::default()).unwrap();
        let result = Command::Call {
            method: "admin.getNetworkName".to_string(),
            params: None,
            path: ADMIN_PATH.to_string(),
        }
        .execute(node)
        .unwrap();

        let reply = match result {
            CommandResult::Reply(reply) => reply,
            other => panic!("expected a reply, got {other:?}"),
        };
        let reply: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply["result"]["networkName"], "local");
    }

    #[test]
    fn test_routes_listing() {
        let node = Node::build(&NodeConfig::default()).unwrap();
        let result = Command::Routes.execute(node).unwrap();
        assert_eq!(result.to_string(), "admin");
    }

    #[test]
    fn test_call_rejects_bad_params_json() {
        let node = Node::build(&NodeConfig::default()).unwrap();
        let result = Command::Call {
            method: "admin.alias".to_string(),
            params: Some("{oops".to_string()),
            path: ADMIN_PATH.to_string(),
        }
        .execute(node);
        assert!(result.is_err());
    }
}
