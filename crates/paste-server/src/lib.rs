//! HTTP server for the pastebin service.
//!
//! Exposes [`PasteService`](paste_core::PasteService) over two JSON
//! endpoints and wires its backends from an [`AppConfig`].

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{AppConfig, BlobBackend, BlobConfig, CacheConfig, ServerConfig, StoreBackend, StoreConfig};
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, CreateTextRequest, CreateTextResponse, HealthResponse, ReadTextRequest};
pub use server::{build_backends, build_service, PasteServer};
