use std::net::SocketAddr;
use std::sync::Arc;

use picoircd::network::Gateway;
use picoircd::state::Core;

/// An in-process server listening on an OS-assigned port.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    pub async fn spawn(password: &str) -> Self {
        let core = Arc::new(Core::new(password.to_string()));
        let gateway = Gateway::bind("127.0.0.1:0".parse().unwrap(), core)
            .await
            .expect("bind test listener");
        let addr = gateway.local_addr().expect("listener address");
        tokio::spawn(gateway.run());
        Self { addr }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}
