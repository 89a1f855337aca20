//! Aria2Client: typed method calls over the aria2 JSON-RPC interface.
//!
//! The client is bound to a single endpoint at construction time and holds no
//! other state: no persistent connection, no pending-call table, no timeout.
//! Each call builds a fresh envelope, performs one HTTP POST, and unwraps the
//! `result` value or classifies the failure. When a shared secret is
//! configured, `"token:<secret>"` is injected as params element 0 on every
//! outgoing request, since aria2's auth model checks positional param 0.

use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Aria2Error, Result};
use crate::rpc::protocol::{RpcFailure, RpcRequest, RpcResponse};

pub const DEFAULT_RPC_HOST: &str = "localhost";
pub const DEFAULT_RPC_PORT: u16 = 6800;

/// Client for the aria2 daemon's JSON-RPC interface.
///
/// # Example
///
/// ```ignore
/// use aria2_client::Aria2Client;
///
/// let client = Aria2Client::new("localhost", 6800, Some("hunter2".into()));
/// let version = client.get_version().await?;
/// println!("aria2 {}", version["version"]);
/// ```
pub struct Aria2Client {
    http: Client,
    url: String,
    secret: Option<String>,
}

impl Aria2Client {
    /// Create a client bound to `http://{host}:{port}/jsonrpc`.
    ///
    /// The endpoint is immutable for the life of the client. No connection is
    /// established until the first call.
    pub fn new(host: &str, port: u16, secret: Option<String>) -> Self {
        Self {
            http: Client::new(),
            url: format!("http://{}:{}/jsonrpc", host, port),
            secret,
        }
    }

    /// The endpoint URL all requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    /// Build a request envelope, injecting the secret token when configured.
    fn build_request(&self, method: &str, mut params: Vec<Value>) -> RpcRequest {
        if let Some(secret) = &self.secret {
            params.insert(0, Value::String(format!("token:{}", secret)));
        }
        RpcRequest::new(method, params)
    }

    /// Send a single RPC call and return the daemon's `result` value.
    ///
    /// Exactly one HTTP POST is attempted; retry policy, if any, is the
    /// caller's concern. The result value is returned verbatim since its
    /// shape varies per method.
    ///
    /// # Errors
    ///
    /// - [`Aria2Error::Transport`] when the HTTP exchange cannot complete
    ///   (connection refused, DNS failure, malformed HTTP response).
    /// - [`Aria2Error::Rpc`] when the daemon reports a method-level failure,
    ///   carrying its code and message untouched, regardless of HTTP status.
    /// - [`Aria2Error::Protocol`] when the body is not valid JSON or carries
    ///   neither `result` nor `error`.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let request = self.build_request(method, params);
        debug!(method, id = %request.id, "sending RPC request");

        let response = self.http.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: RpcResponse = serde_json::from_str(&body)
            .map_err(|e| Aria2Error::Protocol(format!("response is not valid JSON-RPC: {}", e)))?;

        if let Some(RpcFailure { code, message }) = parsed.error {
            return Err(Aria2Error::Rpc { code, message });
        }

        if !status.is_success() {
            return Err(Aria2Error::Protocol(format!(
                "HTTP {} with no RPC error body",
                status
            )));
        }

        parsed.result.ok_or_else(|| {
            Aria2Error::Protocol("response carries neither result nor error".to_string())
        })
    }

    /// Queue the given URIs as a new download. Returns the gid.
    ///
    /// `options` is a per-download option object as aria2 defines it
    /// (e.g. `{"dir": "downloads"}`); `position` is the queue insert index.
    pub async fn add_uri(
        &self,
        uris: Vec<String>,
        options: Option<Value>,
        position: u64,
    ) -> Result<Value> {
        let mut params = vec![json!(uris)];
        if let Some(options) = options {
            params.push(options);
        }
        params.push(json!(position));
        self.call("aria2.addUri", params).await
    }

    /// Remove the download denoted by `gid`, forcibly when `force` is set.
    pub async fn remove(&self, gid: &str, force: bool) -> Result<Value> {
        let method = if force {
            "aria2.forceRemove"
        } else {
            "aria2.remove"
        };
        self.call(method, vec![json!(gid)]).await
    }

    /// Pause one download, or every download when `gid` is absent.
    pub async fn pause(&self, gid: Option<&str>, force: bool) -> Result<Value> {
        let (method, params) = match gid {
            Some(gid) => {
                let method = if force { "aria2.forcePause" } else { "aria2.pause" };
                (method, vec![json!(gid)])
            }
            None => {
                let method = if force {
                    "aria2.forcePauseAll"
                } else {
                    "aria2.pauseAll"
                };
                (method, Vec::new())
            }
        };
        self.call(method, params).await
    }

    /// Resume one download, or every paused download when `gid` is absent.
    pub async fn unpause(&self, gid: Option<&str>) -> Result<Value> {
        match gid {
            Some(gid) => self.call("aria2.unpause", vec![json!(gid)]).await,
            None => self.call("aria2.unpauseAll", Vec::new()).await,
        }
    }

    /// Report the status of one download, restricted to `keys` when non-empty.
    pub async fn tell_status(&self, gid: &str, keys: &[&str]) -> Result<Value> {
        let mut params = vec![json!(gid)];
        params.extend(keys.iter().map(|key| json!(key)));
        self.call("aria2.tellStatus", params).await
    }

    /// List currently active downloads.
    pub async fn tell_active(&self, keys: &[&str]) -> Result<Value> {
        let params = keys.iter().map(|key| json!(key)).collect();
        self.call("aria2.tellActive", params).await
    }

    /// List waiting downloads in the window `[offset, offset + num)`.
    pub async fn tell_waiting(&self, offset: i64, num: u64, keys: &[&str]) -> Result<Value> {
        let mut params = vec![json!(offset), json!(num)];
        params.extend(keys.iter().map(|key| json!(key)));
        self.call("aria2.tellWaiting", params).await
    }

    /// List stopped downloads in the window `[offset, offset + num)`.
    pub async fn tell_stopped(&self, offset: i64, num: u64, keys: &[&str]) -> Result<Value> {
        let mut params = vec![json!(offset), json!(num)];
        params.extend(keys.iter().map(|key| json!(key)));
        self.call("aria2.tellStopped", params).await
    }

    /// Report the daemon's global options.
    pub async fn get_global_option(&self) -> Result<Value> {
        self.call("aria2.getGlobalOption", Vec::new()).await
    }

    /// Report global transfer statistics.
    pub async fn get_global_stat(&self) -> Result<Value> {
        self.call("aria2.getGlobalStat", Vec::new()).await
    }

    /// Purge completed/error/removed downloads from the daemon's memory.
    pub async fn purge_download_result(&self) -> Result<Value> {
        self.call("aria2.purgeDownloadResult", Vec::new()).await
    }

    /// Drop the download result for `gid` from the daemon's memory.
    pub async fn remove_download_result(&self, gid: &str) -> Result<Value> {
        self.call("aria2.removeDownloadResult", vec![json!(gid)]).await
    }

    /// Report the daemon's version and enabled features.
    pub async fn get_version(&self) -> Result<Value> {
        self.call("aria2.getVersion", Vec::new()).await
    }

    /// Ask the daemon to shut itself down via RPC.
    pub async fn stop(&self, force: bool) -> Result<Value> {
        let method = if force {
            "aria2.forceShutdown"
        } else {
            "aria2.shutdown"
        };
        self.call(method, Vec::new()).await
    }

    /// Probe whether the daemon is reachable.
    ///
    /// Liveness is defined as "a harmless RPC call succeeds": a process
    /// handle would only prove that some process exists, not that the
    /// endpoint answers. Only connection-establishment failures count as
    /// "not running"; a daemon that answers with garbage or an RPC error is
    /// reachable but broken, and that failure is propagated.
    pub async fn is_running(&self) -> Result<bool> {
        match self.get_version().await {
            Ok(_) => Ok(true),
            Err(e) if e.is_connection_refused() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl Default for Aria2Client {
    fn default() -> Self {
        Self::new(DEFAULT_RPC_HOST, DEFAULT_RPC_PORT, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_is_fixed_at_construction() {
        let client = Aria2Client::new("localhost", 6800, None);
        assert_eq!(client.url(), "http://localhost:6800/jsonrpc");
    }

    #[test]
    fn default_client_targets_localhost_6800() {
        let client = Aria2Client::default();
        assert_eq!(client.url(), "http://localhost:6800/jsonrpc");
        assert!(client.secret().is_none());
    }

    #[test]
    fn secret_token_is_prepended_to_params() {
        let client = Aria2Client::new("localhost", 6800, Some("hunter2".to_string()));
        let request = client.build_request("aria2.remove", vec![json!("abc")]);
        assert_eq!(request.params, vec![json!("token:hunter2"), json!("abc")]);
    }

    #[test]
    fn secret_token_is_injected_even_for_empty_params() {
        let client = Aria2Client::new("localhost", 6800, Some("hunter2".to_string()));
        let request = client.build_request("aria2.getVersion", Vec::new());
        assert_eq!(request.params, vec![json!("token:hunter2")]);
    }

    #[test]
    fn params_are_untouched_without_a_secret() {
        let client = Aria2Client::new("localhost", 6800, None);
        let request = client.build_request("aria2.remove", vec![json!("abc")]);
        assert_eq!(request.params, vec![json!("abc")]);
    }

    #[test]
    fn each_request_gets_a_fresh_id() {
        let client = Aria2Client::new("localhost", 6800, None);
        let a = client.build_request("aria2.getVersion", Vec::new());
        let b = client.build_request("aria2.getVersion", Vec::new());
        assert_ne!(a.id, b.id);
    }
}
