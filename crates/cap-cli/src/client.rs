//! JSON-RPC client for the CAP tracker daemon.
//!
//! The daemon speaks newline-delimited JSON-RPC 2.0 (one request per line,
//! one response per line). Admin rights belong to the connection, so an
//! `authenticate` call and the writes that need it must share one
//! [`RpcClient`].

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tracing::debug;

/// Errors that can occur talking to the daemon.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Failed to connect to the daemon socket.
    #[error("failed to connect to daemon at '{path}': {reason}")]
    ConnectionFailed { path: String, reason: String },

    #[error("failed to write to daemon socket: {0}")]
    WriteFailed(String),

    #[error("failed to read from daemon socket: {0}")]
    ReadFailed(String),

    /// The daemon closed the connection unexpectedly.
    #[error("daemon disconnected unexpectedly (EOF)")]
    DaemonDisconnected,

    /// The daemon's reply was not valid JSON-RPC.
    #[error("failed to parse daemon response: {reason} (raw: {raw})")]
    ParseFailed { reason: String, raw: String },

    /// The daemon answered with an error object.
    #[error("{message} ({code}){}", detail_suffix(.detail))]
    Rpc {
        code: i64,
        message: String,
        detail: Option<String>,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

/// One connection, and therefore one session, to the daemon.
pub struct RpcClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

impl RpcClient {
    pub async fn connect(socket_path: &str) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(socket_path)
            .await
            .map_err(|e| ClientError::ConnectionFailed {
                path: socket_path.to_string(),
                reason: e.to_string(),
            })?;
        debug!("Connected to daemon socket at {}", socket_path);

        let (reader, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(reader),
            writer,
            next_id: 1,
        })
    }

    /// Call `method` and return its `result`.
    pub async fn call(&mut self, method: &str, params: Value) -> Result<Value, ClientError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});
        let mut line = request.to_string();
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ClientError::WriteFailed(e.to_string()))?;
        self.writer
            .flush()
            .await
            .map_err(|e| ClientError::WriteFailed(e.to_string()))?;
        debug!(method, id, "Sent RPC request");

        let mut response_line = String::new();
        let bytes_read = self
            .reader
            .read_line(&mut response_line)
            .await
            .map_err(|e| ClientError::ReadFailed(e.to_string()))?;
        if bytes_read == 0 {
            return Err(ClientError::DaemonDisconnected);
        }

        let response: Value =
            serde_json::from_str(&response_line).map_err(|e| ClientError::ParseFailed {
                reason: e.to_string(),
                raw: response_line.clone(),
            })?;
        into_result(response, &response_line)
    }
}

/// Split a JSON-RPC response into its result or error.
fn into_result(mut response: Value, raw: &str) -> Result<Value, ClientError> {
    if let Some(error) = response.get("error") {
        return Err(ClientError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("UNKNOWN")
                .to_string(),
            detail: error
                .pointer("/data/detail")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }
    response
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| ClientError::ParseFailed {
            reason: "response has neither result nor error".to_string(),
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UnixListener;

    #[test]
    fn test_error_response_becomes_rpc_error() {
        let response = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32031, "message": "NO_INVENTORY", "data": {"detail": "no inventory stored for 'Pune'"}},
        });
        let err = into_result(response, "").expect_err("error");
        assert_eq!(
            err.to_string(),
            "NO_INVENTORY (-32031): no inventory stored for 'Pune'"
        );
    }

    #[test]
    fn test_result_is_extracted() {
        let response = json!({"jsonrpc": "2.0", "id": 1, "result": {"cities": ["Pune"]}});
        assert_eq!(
            into_result(response, "").expect("result"),
            json!({"cities": ["Pune"]})
        );
        assert!(into_result(json!({"id": 1}), "{}").is_err());
    }

    #[tokio::test]
    async fn test_call_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("daemon.sock");
        let listener = UnixListener::bind(&path).expect("bind");

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader);
            let mut line = String::new();
            while reader.read_line(&mut line).await.expect("read") > 0 {
                let request: Value = serde_json::from_str(&line).expect("json");
                let reply = json!({"jsonrpc": "2.0", "id": request["id"], "result": {"echo": request["method"]}});
                let mut text = reply.to_string();
                text.push('\n');
                writer.write_all(text.as_bytes()).await.expect("write");
                line.clear();
            }
        });

        let mut client = RpcClient::connect(&path.display().to_string())
            .await
            .expect("connect");
        let first = client.call("list_cities", Value::Null).await.expect("first");
        assert_eq!(first, json!({"echo": "list_cities"}));
        let second = client.call("get_roster", Value::Null).await.expect("second");
        assert_eq!(second, json!({"echo": "get_roster"}));
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.sock");
        let err = RpcClient::connect(&path.display().to_string())
            .await
            .err()
            .expect("no daemon");
        assert!(matches!(err, ClientError::ConnectionFailed { .. }));
    }
}
