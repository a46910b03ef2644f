use crate::error::{BootstrapError, TransportError};
use crate::handler::NoteMcpHandler;
use crate::transport::ListenerConfig;
use rmcp::ServiceExt;
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::StreamableHttpService;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Drive the server over the selected listener until the client goes
/// away, the listener fails, or the shutdown token fires.
pub async fn serve(
    handler: NoteMcpHandler,
    listener: ListenerConfig,
    shutdown: CancellationToken,
) -> Result<(), BootstrapError> {
    match listener {
        ListenerConfig::Stdio => serve_stdio(handler, shutdown).await,
        ListenerConfig::Http { host, port, path } => {
            serve_streamable_http(handler, &host, port, &path, shutdown).await
        }
        ListenerConfig::Sse { host, port, path } => {
            serve_sse(handler, &host, port, &path, shutdown).await
        }
    }
}

/// The standard stream pair carries protocol frames here; every log line
/// in this path goes through the established sink, never this stream.
async fn serve_stdio(
    handler: NoteMcpHandler,
    shutdown: CancellationToken,
) -> Result<(), BootstrapError> {
    info!("serving MCP over the standard stream pair");
    let service = handler.serve(stdio()).await.map_err(|e| {
        BootstrapError::StartupFailed(format!("stdio transport failed to initialize: {e}"))
    })?;

    tokio::select! {
        outcome = service.waiting() => {
            outcome.map_err(|e| {
                BootstrapError::Crashed(format!("stdio service task failed: {e}"))
            })?;
            info!("stdio client disconnected");
            Ok(())
        }
        _ = shutdown.cancelled() => {
            info!("shutdown requested; closing stdio transport");
            Ok(())
        }
    }
}

async fn serve_streamable_http(
    handler: NoteMcpHandler,
    host: &str,
    port: u16,
    path: &str,
    shutdown: CancellationToken,
) -> Result<(), BootstrapError> {
    let addr = resolve_addr(host, port).await?;
    let service = StreamableHttpService::new(
        move || Ok(handler.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    // Root is a valid mount path but axum refuses to nest there.
    let router = if path == "/" {
        axum::Router::new().fallback_service(service)
    } else {
        axum::Router::new().nest_service(path, service)
    };

    let tcp = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BootstrapError::StartupFailed(format!("cannot bind {addr}: {e}")))?;
    info!(%addr, path, "serving MCP over streamable HTTP");

    let ct = shutdown.clone();
    axum::serve(tcp, router)
        .with_graceful_shutdown(async move {
            ct.cancelled().await;
            info!("http listener closed");
        })
        .await
        .map_err(|e| BootstrapError::Crashed(format!("http server failed: {e}")))
}

async fn serve_sse(
    handler: NoteMcpHandler,
    host: &str,
    port: u16,
    path: &str,
    shutdown: CancellationToken,
) -> Result<(), BootstrapError> {
    let addr = resolve_addr(host, port).await?;
    let config = SseServerConfig {
        bind: addr,
        sse_path: path.to_string(),
        post_path: "/message".to_string(),
        ct: shutdown.clone(),
        sse_keep_alive: None,
    };
    let (sse_server, router) = SseServer::new(config);

    let tcp = tokio::net::TcpListener::bind(sse_server.config.bind)
        .await
        .map_err(|e| BootstrapError::StartupFailed(format!("cannot bind {addr}: {e}")))?;
    info!(%addr, path, "serving MCP over SSE");

    let ct = sse_server.config.ct.child_token();
    let server = axum::serve(tcp, router).with_graceful_shutdown(async move {
        ct.cancelled().await;
        info!("sse listener closed");
    });
    let io_task = tokio::spawn(async move {
        if let Err(e) = server.await {
            error!(error = %e, "sse server shut down with error");
        }
    });

    let service_ct = sse_server.with_service(move || handler.clone());

    shutdown.cancelled().await;
    service_ct.cancel();
    let _ = io_task.await;
    Ok(())
}

async fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr, BootstrapError> {
    let mut addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        TransportError::InvalidBinding(format!("cannot resolve {host}:{port}: {e}"))
    })?;
    addrs.next().ok_or_else(|| {
        TransportError::InvalidBinding(format!("{host}:{port} resolves to no addresses")).into()
    })
}
