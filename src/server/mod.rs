pub mod api;

use crate::cli::Args;
use crate::error::ConfigError;
use crate::llm::completion::CompletionGateway;
use std::error::Error;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use axum_server::Handle;
use axum::http::{ HeaderValue, Method, header::{ AUTHORIZATION, CONTENT_TYPE } };
use tower_http::cors::CorsLayer;
use log::{ info, error };

const CORS_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60 * 5);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Handle for an axum-server listener that starts a graceful shutdown once
/// `signal` resolves.
pub fn shutdown_handle<F>(signal: F) -> Handle where F: Future<Output = ()> + Send + 'static {
    let handle = Handle::new();
    let watcher = handle.clone();
    tokio::spawn(async move {
        signal.await;
        watcher.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });
    handle
}

pub fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string()))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(CORS_MAX_AGE))
}

pub struct Server {
    addr: String,
    gateway: Arc<CompletionGateway>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, gateway: Arc<CompletionGateway>, args: Args) -> Self {
        Self { addr, gateway, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr.parse::<SocketAddr>()?;
        let app = api::build_router(self.gateway.clone()).layer(cors_layer(&self.args.cors_origin)?);

        let tls_paths = match (&self.args.tls_cert_path, &self.args.tls_key_path) {
            (Some(cert), Some(key)) if self.args.enable_tls => Some((cert, key)),
            _ => None,
        };

        if let Some((cert_path, key_path)) = tls_paths {
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            info!("HTTPS server listening on https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(shutdown_handle(shutdown_signal()))
                .serve(app.into_make_service()).await?;
        } else {
            if self.args.enable_tls {
                error!("ENABLE_TLS is set but TLS_CERT_PATH/TLS_KEY_PATH are missing; serving plain HTTP");
            }
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
                e
            })?;

            info!("HTTP server listening on http://{}", addr);
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(shutdown_signal()).await?;
        }

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
