use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::TestServer;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A line-oriented TCP client for driving the server in tests.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let stream = TcpStream::connect(server.addr())
            .await
            .expect("connect to test server");
        let (read, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer,
        }
    }

    /// Send one command line (newline appended).
    pub async fn send_line(&mut self, line: &str) {
        self.send_raw(format!("{line}\n").as_bytes()).await;
    }

    /// Send raw bytes without any framing, for split-write tests.
    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.expect("write to server");
        self.writer.flush().await.expect("flush to server");
    }

    /// Receive one reply line, failing the test after a timeout.
    pub async fn recv_line(&mut self) -> String {
        let mut line = String::new();
        let n = timeout(RECV_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for a reply")
            .expect("read from server");
        assert_ne!(n, 0, "server closed the connection unexpectedly");
        line.trim_end_matches('\n').to_string()
    }

    /// Assert the next reply line.
    pub async fn expect(&mut self, want: &str) {
        let got = self.recv_line().await;
        assert_eq!(got, want);
    }

    /// Wait for the server to close the connection.
    pub async fn expect_closed(&mut self) {
        let mut line = String::new();
        let n = timeout(RECV_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for close")
            .expect("read from server");
        assert_eq!(n, 0, "expected EOF, got: {line:?}");
    }

    /// Run the full registration exchange and assert the three replies.
    pub async fn register(&mut self, password: &str, nick: &str, user: &str) {
        self.send_line(&format!("PASS {password}")).await;
        self.expect("Welcome to IRC server!").await;
        self.send_line(&format!("NICK {nick}")).await;
        self.expect(&format!("Nickname set to {nick}")).await;
        self.send_line(&format!("USER {user} localhost irc :{user}")).await;
        self.expect(&format!("User information set. Welcome {user}!")).await;
    }
}
