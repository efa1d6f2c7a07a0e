//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio::signal;
use log::{debug, error, info, warn};

use crate::parser::{expected_len, parse_request, Error as ParserError};
use crate::response::{HttpResponse, StatusCode};
use crate::router::{Error, Router};
use crate::server::config::ServerConfig;

/// An HTTP server.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The router every request is dispatched to.
    pub router: Arc<Router>,
}

impl HttpServer {
    /// Create a new HTTP server. The router is frozen from here on.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    /// Display the server banner and registered endpoints.
    fn display_server_info(&self) {
        let banner = include_str!("../banner.txt");
        info!("\n{banner}");

        info!("Registered endpoints:");
        for route in self.router.routes() {
            info!("  {method:<7} {pattern}", method = route.method, pattern = route.pattern);
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);
        Ok(listener)
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(shutdown_tx: Arc<mpsc::Sender<()>>, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Handle a new connection.
    async fn handle_new_connection(
        mut socket: tokio::net::TcpStream,
        addr: SocketAddr,
        semaphore: Arc<Semaphore>,
        router: Arc<Router>,
        config: ServerConfig,
        tasks: &mut JoinSet<()>,
    ) {
        let permit = match semaphore.try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {addr}");
                let response = HttpResponse::new(StatusCode::ServiceUnavailable)
                    .with_content_type("text/plain")
                    .with_body_string("Server is at capacity, please try again later");
                let _ = socket.write_all(&response.to_bytes()).await;
                return;
            }
        };

        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the semaphore slot
            let _permit = permit;

            match Self::handle_connection(&mut socket, &router, &config).await {
                Ok(()) => {}
                Err(e @ (Error::NotFound(_) | Error::MethodNotAllowed(_, _))) => {
                    debug!("{addr}: {e}");
                }
                Err(e) => {
                    error!("Error handling connection from {addr}: {e}");
                }
            }
        });
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // For other errors, wait a bit before retrying
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        false
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        }).await;

        info!("Server shutdown complete");
    }

    /// Start the server and listen for incoming connections.
    pub async fn start(&self) -> Result<(), Error> {
        self.display_server_info();

        let listener = self.setup_listener().await?;

        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let shutdown_tx = Arc::new(shutdown_tx);

        // Use JoinSet to keep track of all spawned tasks
        let mut tasks = JoinSet::new();

        Self::setup_ctrl_c_handler(shutdown_tx, &mut tasks);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(
                                socket,
                                addr,
                                semaphore.clone(),
                                self.router.clone(),
                                self.config.clone(),
                                &mut tasks,
                            ).await;
                        }
                        Err(e) => {
                            if Self::handle_connection_error(e).await {
                                break;
                            }
                        }
                    }
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Read until the whole request announced by its head has arrived.
    ///
    /// Returns `Ok(None)` if the peer closed the connection without sending
    /// anything.
    async fn read_request(
        socket: &mut (impl AsyncRead + Unpin),
        config: &ServerConfig,
    ) -> Result<Option<Vec<u8>>, Error> {
        let mut buf = Vec::with_capacity(config.read_buffer_size);
        let mut chunk = vec![0; config.read_buffer_size];

        loop {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Ok((!buf.is_empty()).then_some(buf));
            }
            buf.extend_from_slice(&chunk[..n]);

            if buf.len() > config.max_request_size {
                return Err(Error::RequestTooLarge(config.max_request_size));
            }

            match expected_len(&buf) {
                Ok(Some(len)) if len > config.max_request_size => {
                    return Err(Error::RequestTooLarge(config.max_request_size));
                }
                Ok(Some(len)) if buf.len() >= len => return Ok(Some(buf)),
                Ok(_) => {}
                Err(ParserError::ContentLengthOverflow(_)) => {
                    return Err(Error::RequestTooLarge(config.max_request_size));
                }
                // Let the parser report the malformed head
                Err(_) => return Ok(Some(buf)),
            }
        }
    }

    /// Handle a single connection.
    ///
    /// The returned error is diagnostic only: by the time it is returned a
    /// response has already been written to `socket`.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        router: &Router,
        config: &ServerConfig,
    ) -> Result<(), Error> {
        let buf = match Self::read_request(socket, config).await {
            Ok(Some(buf)) => buf,
            Ok(None) => return Ok(()), // Connection closed
            Err(Error::RequestTooLarge(limit)) => {
                let response = HttpResponse::new(StatusCode::PayloadTooLarge)
                    .with_content_type("text/plain")
                    .with_body_string(format!("Request exceeds {limit} bytes"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::RequestTooLarge(limit));
            }
            Err(e) => return Err(e),
        };

        let request = match parse_request(&buf) {
            Ok(req) => req,
            Err(e) => {
                let response = HttpResponse::new(StatusCode::BadRequest)
                    .with_content_type("text/plain")
                    .with_body_string(format!("Error parsing request: {e}"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::ParseError(e));
            }
        };

        debug!("{} {}", request.method, request.path);
        let dispatch = router.dispatch(request);

        socket.write_all(&dispatch.response.to_bytes()).await?;
        socket.flush().await?;

        dispatch.result
    }
}
