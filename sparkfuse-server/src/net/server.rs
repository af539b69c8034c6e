use crate::error::{AppResult, InfraError};
use crate::net::AppCtx;
use crate::net::connection::handle_connection;
use crate::net::line::LineConnection;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;

/// Bind `addr` and serve sessions until the process ends.
pub async fn serve(addr: std::net::SocketAddr, tls: Option<TlsAcceptor>, app: Arc<AppCtx>) -> AppResult<()> {
    let listener = TcpListener::bind(&addr).await.map_err(InfraError::from)?;
    tracing::info!(%addr, tls = tls.is_some(), "listening");
    serve_listener(listener, tls, app).await
}

/// Accept loop over an already bound listener. One task per connection.
pub async fn serve_listener(listener: TcpListener, tls: Option<TlsAcceptor>, app: Arc<AppCtx>) -> AppResult<()> {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::info!(%peer, "client connected");
                let app = app.clone();
                let tls = tls.clone();

                tokio::spawn(async move {
                    if let Err(e) = serve_stream(stream, peer.to_string(), tls, app).await {
                        tracing::error!(%peer, error = %e, "connection error");
                    }
                    tracing::info!(%peer, "client disconnected");
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to accept connection");
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            }
        }
    }
}

async fn serve_stream(stream: TcpStream, peer: String, tls: Option<TlsAcceptor>, app: Arc<AppCtx>) -> anyhow::Result<()> {
    let _ = stream.set_nodelay(true);

    match tls {
        Some(acceptor) => {
            let stream = acceptor.accept(stream).await?;
            let (r, w) = tokio::io::split(stream);
            handle_connection(LineConnection::new(BufReader::new(r), w), app, peer).await?;
        }
        None => {
            let (r, w) = stream.into_split();
            handle_connection(LineConnection::new(BufReader::new(r), w), app, peer).await?;
        }
    }
    Ok(())
}
