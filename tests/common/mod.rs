//! Shared harness for the integration tests: an in-process server bound to
//! an ephemeral port and a line-oriented TCP test client.
#![allow(dead_code)]

pub mod client;
pub mod server;

pub use client::TestClient;
pub use server::TestServer;

pub const PASSWORD: &str = "hunter2";
