//! Shared utilities for integration tests.

use std::net::SocketAddr;

use product_catalog::config::AppConfig;
use product_catalog::{ApiServer, ProductStore, Shutdown};
use reqwest::{Method, RequestBuilder};
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-key";

/// A catalog server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Request carrying the valid API key.
    pub fn authed(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("X-API-Key", API_KEY)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a seeded server that accepts `API_KEY`.
pub async fn start_server() -> TestServer {
    let mut config = AppConfig::default();
    config.auth.api_key = Some(API_KEY.to_string());
    start_with(config, None).await
}

/// Start a server with explicit config and, optionally, store contents.
pub async fn start_with(config: AppConfig, store: Option<ProductStore>) -> TestServer {
    let server = match store {
        Some(store) => ApiServer::with_store(config, store),
        None => ApiServer::new(config),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    TestServer {
        addr,
        client,
        shutdown,
    }
}
