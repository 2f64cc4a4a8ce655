use rangeview_core::MarkerFrame;
use std::io::{self, Write};
use thiserror::Error;

// --- Error Type ---

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("binary serialization failed: {0}")]
    Binary(#[from] bincode::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "websocket")]
    #[error("websocket error: {0}")]
    WebSocket(String),
}

// --- Traits ---

/// Serializes a marker frame into a wire representation.
pub trait Serializer: Send + Sync {
    fn serialize(&self, frame: &MarkerFrame) -> Result<String, TransportError>;
}

/// Sends serialized frames to a destination.
pub trait Sender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

// --- Serializers ---

/// Serializes frames to JSON, one object per frame.
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, frame: &MarkerFrame) -> Result<String, TransportError> {
        Ok(serde_json::to_string(frame)?)
    }
}

/// Serializes frames with bincode, base64-encoded for line-oriented
/// transports.
pub struct BinarySerializer;

impl Serializer for BinarySerializer {
    fn serialize(&self, frame: &MarkerFrame) -> Result<String, TransportError> {
        let bytes = bincode::serialize(frame)?;
        Ok(base64::encode(bytes))
    }
}

// --- Senders ---

/// Writes newline-delimited frames to standard output.
pub struct StdioSender {
    stdout: io::Stdout,
}

impl StdioSender {
    pub fn new() -> Self {
        StdioSender { stdout: io::stdout() }
    }
}

impl Sender for StdioSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.stdout.write_all(data)?;
        self.stdout.write_all(b"\n")?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for StdioSender {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangeview_core::{Marker, MarkerKind};

    fn frame() -> MarkerFrame {
        MarkerFrame {
            tick: 7,
            live_aircraft: false,
            markers: vec![Marker {
                id: "sim-vessel-0".to_string(),
                kind: MarkerKind::Vessel,
                x: 92.5,
                y: 71.0,
                heading: Some(135.0),
                label: Some("VESSEL".to_string()),
                active: true,
            }],
        }
    }

    #[test]
    fn json_serializer_emits_frame_fields() {
        let json = JsonSerializer.serialize(&frame()).unwrap();
        assert!(json.contains(r#""tick":7"#));
        assert!(json.contains(r#""live_aircraft":false"#));
        assert!(json.contains(r#""kind":"vessel""#));
        assert!(json.contains(r#""label":"VESSEL""#));
    }

    #[test]
    fn binary_serializer_round_trips() {
        let encoded = BinarySerializer.serialize(&frame()).unwrap();
        let bytes = base64::decode(encoded).unwrap();
        let decoded: MarkerFrame = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, frame());
    }
}

#[cfg(feature = "websocket")]
mod websocket {
    use super::*;
    use futures::sink::SinkExt;
    use futures::stream::StreamExt;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::runtime::Runtime;
    use tokio::sync::broadcast;
    use tokio_tungstenite::accept_async;
    use tokio_tungstenite::tungstenite::{Error as WsError, Message};

    /// Broadcasts marker frames to connected dashboard clients.
    ///
    /// The server runs on its own tokio runtime in the background; the tick
    /// loop stays synchronous and just hands frames to the broadcast channel.
    pub struct WebSocketSender {
        host: String,
        port: u16,
        tx: Option<broadcast::Sender<String>>,
        runtime: Option<Runtime>,
        client_count: Arc<AtomicUsize>,
    }

    impl WebSocketSender {
        pub fn new(host: &str, port: u16) -> Self {
            WebSocketSender {
                host: host.to_string(),
                port,
                tx: None,
                runtime: None,
                client_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Starts the listener in a background runtime.
        pub fn start(&mut self) -> Result<(), TransportError> {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .map_err(|e| TransportError::WebSocket(e.to_string()))?;

            let addr: SocketAddr = format!("{}:{}", self.host, self.port)
                .parse()
                .map_err(|e| TransportError::WebSocket(format!("invalid address: {e}")))?;

            let (tx, _) = broadcast::channel::<String>(16);
            self.tx = Some(tx.clone());
            let client_count = self.client_count.clone();

            runtime.spawn(async move {
                let listener = match TcpListener::bind(&addr).await {
                    Ok(listener) => listener,
                    Err(e) => {
                        eprintln!("failed to bind websocket listener on {addr}: {e}");
                        return;
                    }
                };

                while let Ok((stream, peer)) = listener.accept().await {
                    let rx = tx.subscribe();
                    let client_count = client_count.clone();
                    tokio::spawn(async move {
                        client_count.fetch_add(1, Ordering::SeqCst);
                        handle_connection(stream, rx, peer.to_string()).await;
                        client_count.fetch_sub(1, Ordering::SeqCst);
                    });
                }
            });

            self.runtime = Some(runtime);
            Ok(())
        }

        pub fn client_count(&self) -> usize {
            self.client_count.load(Ordering::SeqCst)
        }
    }

    impl Sender for WebSocketSender {
        fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
            let tx = self
                .tx
                .as_ref()
                .ok_or_else(|| TransportError::WebSocket("server not started".to_string()))?;

            let text = std::str::from_utf8(data)
                .map_err(|e| TransportError::WebSocket(format!("invalid UTF-8: {e}")))?;

            // A send with no subscribers just means no client is connected;
            // frames are not buffered for late joiners.
            if self.client_count() > 0 {
                tx.send(text.to_string())
                    .map_err(|e| TransportError::WebSocket(format!("broadcast error: {e}")))?;
            }
            Ok(())
        }
    }

    async fn handle_connection(stream: TcpStream, mut rx: broadcast::Receiver<String>, peer: String) {
        let ws_stream = match accept_async(stream).await {
            Ok(stream) => stream,
            Err(e) => {
                eprintln!("websocket handshake failed for {peer}: {e}");
                return;
            }
        };

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        loop {
            tokio::select! {
                frame = rx.recv() => {
                    match frame {
                        Ok(data) => {
                            if let Err(e) = ws_sender.send(Message::Text(data)).await {
                                if !is_disconnect_error(&e) {
                                    eprintln!("websocket send error for {peer}: {e}");
                                }
                                break;
                            }
                        }
                        // Lagged receivers skip ahead; a closed channel ends the session.
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                incoming = ws_receiver.next() => {
                    // Clients only listen; any close or error ends the session.
                    match incoming {
                        Some(Ok(_)) => continue,
                        _ => break,
                    }
                }
            }
        }
    }

    fn is_disconnect_error(e: &WsError) -> bool {
        match e {
            WsError::ConnectionClosed | WsError::AlreadyClosed => true,
            WsError::Io(io_err) => matches!(
                io_err.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
            ),
            _ => false,
        }
    }
}

#[cfg(feature = "websocket")]
pub use websocket::WebSocketSender;
