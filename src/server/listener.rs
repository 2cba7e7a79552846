// ────────────────────────────────
// src/server/listener.rs
// Binding the listening port is the only fatal condition once configuration
// has been validated.
// ────────────────────────────────
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub async fn bind_tcp(addr: SocketAddr) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Unable to bind {addr}"))?;
    Ok(listener)
}
