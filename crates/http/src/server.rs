//! A TCP accept loop around [`HttpConnection`].
//!
//! ```no_run
//! # use httpd_core::handler::Handler;
//! # async fn run<H: Handler + 'static>(handler: H) -> Result<(), httpd_core::server::ServerError>
//! # where <H::RespBody as http_body::Body>::Error: std::fmt::Display {
//! use httpd_core::server::Server;
//!
//! Server::builder().address("127.0.0.1:8080").max_connections(64).handler(handler).build()?.start().await
//! # }
//! ```

use std::fmt::Display;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use http_body::Body;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::codec::FrameLimits;
use crate::connection::HttpConnection;
use crate::handler::Handler;

/// Address used when none is configured.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";

/// Connections served at the same time when no limit is configured.
pub const DEFAULT_MAX_CONNECTIONS: usize = 256;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("handler must be set")]
    MissingHandler,

    #[error("invalid address: {source}")]
    InvalidAddress { source: io::Error },

    #[error("bind server error: {source}")]
    Bind { source: io::Error },
}

pub struct ServerBuilder<H> {
    handler: Option<H>,
    address: io::Result<Vec<SocketAddr>>,
    max_connections: usize,
    frame_limits: FrameLimits,
    connection_timeout: Option<Duration>,
}

impl<H> ServerBuilder<H> {
    fn new() -> Self {
        Self {
            handler: None,
            address: DEFAULT_ADDRESS.to_socket_addrs().map(Iterator::collect),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            frame_limits: FrameLimits::default(),
            connection_timeout: None,
        }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = address.to_socket_addrs().map(Iterator::collect);
        self
    }

    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Caps the number of connections served at once; further accepts wait
    /// for a running connection to finish. Zero is treated as one.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn frame_limits(mut self, frame_limits: FrameLimits) -> Self {
        self.frame_limits = frame_limits;
        self
    }

    /// Gives up on a connection that has not finished within `timeout`.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Server<H>, ServerError> {
        let handler = self.handler.ok_or(ServerError::MissingHandler)?;
        let address = self.address.map_err(|source| ServerError::InvalidAddress { source })?;

        Ok(Server {
            handler: Arc::new(handler),
            address,
            max_connections: self.max_connections,
            frame_limits: self.frame_limits,
            connection_timeout: self.connection_timeout,
        })
    }
}

impl<H> std::fmt::Debug for ServerBuilder<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("address", &self.address)
            .field("max_connections", &self.max_connections)
            .field("frame_limits", &self.frame_limits)
            .field("connection_timeout", &self.connection_timeout)
            .finish_non_exhaustive()
    }
}

pub struct Server<H> {
    handler: Arc<H>,
    address: Vec<SocketAddr>,
    max_connections: usize,
    frame_limits: FrameLimits,
    connection_timeout: Option<Duration>,
}

impl<H> Server<H> {
    pub fn builder() -> ServerBuilder<H> {
        ServerBuilder::new()
    }
}

impl<H> Server<H>
where
    H: Handler + 'static,
    <H::RespBody as Body>::Error: Display,
{
    /// Binds the configured address and serves connections until the task is
    /// dropped.
    pub async fn start(self) -> Result<(), ServerError> {
        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(ServerError::Bind { source: e });
            }
        };

        self.serve(tcp_listener).await;
        Ok(())
    }

    /// Serves connections accepted from an already bound listener.
    pub async fn serve(self, tcp_listener: TcpListener) {
        let permits = Arc::new(Semaphore::new(self.max_connections));

        loop {
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                // the semaphore is never closed
                return;
            };

            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&self.handler);
            let connection = HttpConnection::with_limits(tcp_stream, self.frame_limits);
            let timeout = self.connection_timeout;

            tokio::spawn(async move {
                let result = match timeout {
                    Some(timeout) => match tokio::time::timeout(timeout, connection.process(handler)).await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!(%remote_addr, ?timeout, "connection timed out");
                            drop(permit);
                            return;
                        }
                    },
                    None => connection.process(handler).await,
                };

                match result {
                    Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
                    Err(e) => error!(%remote_addr, cause = %e, "service has error, connection shutdown"),
                }
                drop(permit);
            });
        }
    }
}

impl<H> std::fmt::Debug for Server<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("address", &self.address)
            .field("max_connections", &self.max_connections)
            .field("frame_limits", &self.frame_limits)
            .field("connection_timeout", &self.connection_timeout)
            .finish_non_exhaustive()
    }
}
