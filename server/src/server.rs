//! Server startup and binding.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use centre_core::store::{KvStore, SqliteStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::routes;

pub struct Server {
    config: Arc<ServerConfig>,
    router: Router,
}

impl Server {
    /// Open the state store and wire the full router.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store: Arc<dyn KvStore> = if config.db_path == ":memory:" {
            Arc::new(SqliteStore::in_memory().context("open in-memory state store")?)
        } else {
            Arc::new(SqliteStore::open(&config.db_path).context("open state store")?)
        };
        Ok(Self::with_store(config, store))
    }

    /// Wire the router over an existing store. Tests inject MemoryStore.
    pub fn with_store(config: ServerConfig, store: Arc<dyn KvStore>) -> Self {
        let config = Arc::new(config);
        let router = routes::build_router(config.clone(), store);
        Self { config, router }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("invalid host/port")
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(self) -> Result<()> {
        let addr = self.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        log::info!("centre-server listening on {addr}");
        axum::serve(listener, self.router).await?;
        Ok(())
    }

    /// Serve on a caller-provided listener; used by tests binding port 0.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        log::info!("centre-server listening on {addr}");
        axum::serve(listener, self.router).await?;
        Ok(())
    }

    #[cfg(test)]
    async fn spawn_test_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
        use centre_core::store::MemoryStore;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = Self::with_store(ServerConfig::default(), Arc::new(MemoryStore::new()));
        let handle = tokio::spawn(async move {
            server.run_with_listener(listener).await.ok();
        });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        (addr, handle)
    }
}
