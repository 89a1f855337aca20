//! JSON-RPC transport for the aria2 daemon.
//!
//! ## Components
//!
//! - [`protocol`]: JSON-RPC 2.0 request/response envelope types
//! - [`client`]: [`Aria2Client`] with typed wrappers for each aria2 method

pub mod client;
pub mod protocol;

pub use client::Aria2Client;
pub use protocol::{RpcFailure, RpcRequest, RpcResponse};
