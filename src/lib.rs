//! Async client for the aria2 download daemon.
//!
//! aria2 exposes a JSON-RPC 2.0 interface over HTTP. This crate wraps that
//! interface with typed method calls ([`Aria2Client`]) and manages the
//! daemon's lifecycle: starting it as a detached background process, probing
//! it over the network, and stopping or force-killing it.

pub mod daemon;
pub mod error;
pub mod process;
pub mod rpc;

pub use error::{Aria2Error, Result};
pub use process::{CommandOutput, run_command};
pub use rpc::client::Aria2Client;
