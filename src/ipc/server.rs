//! Unix domain socket server for IPC
//!
//! Provides request-response communication and push notifications of
//! session events to subscribed clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::events::SessionEvent;
use crate::host::Command;
use crate::relay::Relay;

use super::codec::{read_frame, write_message, FrameError};
use super::protocol::{DaemonStatus, Notification, Request, Response};

/// Everything a client handler needs, shared across connections
pub struct ServerContext {
    /// Sender into the event loop
    pub commands: mpsc::Sender<Command>,
    /// Session events to forward to subscribers
    pub events: broadcast::Sender<SessionEvent>,
    pub relay: Relay,
    pub start_time: Instant,
}

impl ServerContext {
    pub fn new(
        commands: mpsc::Sender<Command>,
        events: broadcast::Sender<SessionEvent>,
        relay: Relay,
    ) -> Self {
        Self {
            commands,
            events,
            relay,
            start_time: Instant::now(),
        }
    }
}

/// Anything written back to a client
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outbound {
    Response(Response),
    Notification(Notification),
}

/// IPC Server handling client connections
pub struct Server {
    socket_path: PathBuf,
    listener: UnixListener,
    context: Arc<ServerContext>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Server {
    /// Bind a new IPC server
    pub fn new(socket_path: &Path, context: ServerContext) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        // Remove stale socket if it exists
        if socket_path.exists() {
            std::fs::remove_file(socket_path).context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path).context("failed to bind Unix socket")?;

        // Owner-only
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))
                .context("failed to restrict socket permissions")?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        info!(?socket_path, "IPC server listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener,
            context: Arc::new(context),
            shutdown_tx,
        })
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let context = Arc::clone(&self.context);
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::handle_client(stream, context) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Handle a single client connection
    async fn handle_client(stream: UnixStream, context: Arc<ServerContext>) -> Result<()> {
        let (mut reader, writer) = stream.into_split();
        let (out_tx, out_rx) = mpsc::channel::<Outbound>(32);
        let writer_task = tokio::spawn(Self::write_loop(writer, out_rx));
        let mut forwarder: Option<JoinHandle<()>> = None;

        let result = loop {
            let body = match read_frame(&mut reader).await {
                Ok(Some(body)) => body,
                Ok(None) => {
                    debug!("client disconnected");
                    break Ok(());
                }
                Err(FrameError::TooLarge(len)) => {
                    warn!(len, "message too large, disconnecting");
                    break Ok(());
                }
                Err(e) => break Err(e).context("failed to read request"),
            };

            let request: Request = match serde_json::from_slice(&body) {
                Ok(request) => request,
                Err(e) => {
                    debug!(?e, "malformed request");
                    let response = Response::error("bad_request", e.to_string());
                    if out_tx.send(Outbound::Response(response)).await.is_err() {
                        break Ok(());
                    }
                    continue;
                }
            };

            debug!(?request, "received request");

            let (response, subscribe) = Self::process_request(request, &context).await;

            // Subscribe before acknowledging so no event is lost, but start
            // forwarding only once the acknowledgement is queued
            let event_rx = (subscribe && forwarder.is_none()).then(|| context.events.subscribe());

            if out_tx.send(Outbound::Response(response)).await.is_err() {
                break Ok(());
            }

            if let Some(event_rx) = event_rx {
                debug!("client subscribed to notifications");
                forwarder = Some(tokio::spawn(Self::forward_events(event_rx, out_tx.clone())));
            }
        };

        if let Some(forwarder) = forwarder {
            forwarder.abort();
        }
        drop(out_tx);
        let _ = writer_task.await;

        result
    }

    /// Drain outbound messages onto the socket
    async fn write_loop(mut writer: OwnedWriteHalf, mut out_rx: mpsc::Receiver<Outbound>) {
        while let Some(msg) = out_rx.recv().await {
            if let Err(e) = write_message(&mut writer, &msg).await {
                warn!(?e, "failed to write to client");
                break;
            }
        }
    }

    /// Push session events to one subscribed client
    async fn forward_events(
        mut event_rx: broadcast::Receiver<SessionEvent>,
        out_tx: mpsc::Sender<Outbound>,
    ) {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    let msg = Outbound::Notification(Notification::SessionEvent { event });
                    if out_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Process a request and return a response
    /// Returns (Response, should_subscribe)
    async fn process_request(request: Request, context: &ServerContext) -> (Response, bool) {
        match request {
            Request::Ping => (Response::Pong, false),

            Request::GetStatus => {
                let (reply, rx) = oneshot::channel();
                let response = match Self::query(context, Command::Snapshot { reply }, rx).await {
                    Some(input) => Response::Status(DaemonStatus {
                        input,
                        uptime_secs: context.start_time.elapsed().as_secs(),
                        ..DaemonStatus::default()
                    }),
                    None => Self::unavailable(),
                };
                (response, false)
            }

            Request::Dispatch { event } => {
                let response = match context.commands.send(Command::Dispatch(event)).await {
                    Ok(()) => Response::Accepted,
                    Err(_) => Self::unavailable(),
                };
                (response, false)
            }

            Request::IsPressed { key } => {
                let (reply, rx) = oneshot::channel();
                let command = Command::IsPressed {
                    key: key.clone(),
                    reply,
                };
                let response = match Self::query(context, command, rx).await {
                    Some(pressed) => Response::Pressed { key, pressed },
                    None => Self::unavailable(),
                };
                (response, false)
            }

            Request::Subscribe => (Response::Subscribed, true),

            Request::Relay { message } => {
                context.relay.handle(&message);
                (Response::Relayed, false)
            }
        }
    }

    /// Send a command and wait for its reply
    async fn query<T>(context: &ServerContext, command: Command, rx: oneshot::Receiver<T>) -> Option<T> {
        context.commands.send(command).await.ok()?;
        rx.await.ok()
    }

    fn unavailable() -> Response {
        Response::error("unavailable", "event loop is not running")
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        // Remove socket file
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("IPC server shutdown complete");
    }
}
