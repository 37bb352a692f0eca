use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use paste_blob::{BlobStore, FsBlobStore, InMemoryBlobStore};
use paste_cache::{DisabledCache, HashCache, TtlCache};
use paste_core::{Backends, PasteService};
use paste_crypto::Argon2Hasher;
use paste_store::{InMemoryRecordStore, RecordStore, SqliteRecordStore};

use crate::config::{AppConfig, BlobBackend, StoreBackend};
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Open the backends selected by `config`.
pub async fn build_backends(config: &AppConfig) -> ServerResult<Backends> {
    let records: Arc<dyn RecordStore> = match config.store.backend {
        StoreBackend::Sqlite => Arc::new(
            SqliteRecordStore::connect(&config.store.database_url, config.store.max_connections)
                .await?,
        ),
        StoreBackend::Memory => Arc::new(InMemoryRecordStore::new()),
    };
    let blobs: Arc<dyn BlobStore> = match config.blobs.backend {
        BlobBackend::Fs => Arc::new(FsBlobStore::open(config.blobs.root.clone())?),
        BlobBackend::Memory => Arc::new(InMemoryBlobStore::new()),
    };
    let cache: Arc<dyn HashCache> = if config.cache.enabled {
        Arc::new(TtlCache::new(config.cache.max_entries))
    } else {
        Arc::new(DisabledCache)
    };
    tracing::info!(
        store = ?config.store.backend,
        blobs = ?config.blobs.backend,
        cache = config.cache.enabled,
        "backends ready"
    );
    Ok(Backends::new(records, blobs, cache))
}

/// Wire a [`PasteService`] from `config`.
pub async fn build_service(config: &AppConfig) -> ServerResult<PasteService> {
    let backends = build_backends(config).await?;
    let hasher = Argon2Hasher::new(config.hashing)?;
    Ok(PasteService::new(
        backends,
        Arc::new(hasher),
        config.service.clone(),
    ))
}

/// Pastebin HTTP server.
pub struct PasteServer {
    config: AppConfig,
    service: Arc<PasteService>,
}

impl PasteServer {
    pub fn new(config: AppConfig, service: Arc<PasteService>) -> Self {
        Self { config, service }
    }

    /// Open backends per `config` and build a server around them.
    pub async fn from_config(config: AppConfig) -> ServerResult<Self> {
        let service = build_service(&config).await?;
        Ok(Self::new(config, Arc::new(service)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(
            AppState {
                service: Arc::clone(&self.service),
            },
            self.config.server.max_body_bytes,
        )
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown(
        self,
        signal: impl Future<Output = ()> + Send + 'static,
    ) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.server.bind_addr).await?;
        tracing::info!("pastebin server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
