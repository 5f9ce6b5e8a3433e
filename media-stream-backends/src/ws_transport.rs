//! WebSocket transport over tungstenite.
//!
//! Dials TCP with a connect timeout, wraps in TLS for `wss://` URLs, and
//! performs the WebSocket upgrade. After the upgrade the socket's read
//! timeout is dropped to the polling interval so `try_recv` returns
//! `Ok(None)` instead of blocking.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use media_stream_core::models::error::ConnectionError;
use media_stream_core::traits::transport::{Transport, TransportConnector};

/// Dials one `WsTransport` per connection attempt.
pub struct WsConnector {
    url: String,
    connect_timeout: Duration,
    poll_timeout: Duration,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(10),
            poll_timeout: Duration::from_millis(50),
        }
    }

    pub fn with_timeouts(mut self, connect: Duration, poll: Duration) -> Self {
        self.connect_timeout = connect;
        self.poll_timeout = poll;
        self
    }
}

impl TransportConnector for WsConnector {
    fn connect(&self) -> Result<Box<dyn Transport>, ConnectionError> {
        let url = url::Url::parse(&self.url)
            .map_err(|e| ConnectionError::Transport(format!("invalid url: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| ConnectionError::Transport("no host in url".into()))?;
        let use_tls = match url.scheme() {
            "wss" => true,
            "ws" => false,
            other => {
                return Err(ConnectionError::Transport(format!(
                    "unsupported scheme: {other}"
                )))
            }
        };
        let port = url.port().unwrap_or(if use_tls { 443 } else { 80 });

        let addr = format!("{host}:{port}")
            .to_socket_addrs()
            .map_err(|e| ConnectionError::Transport(format!("failed to resolve {host}: {e}")))?
            .next()
            .ok_or_else(|| ConnectionError::Transport(format!("no address for {host}")))?;

        let tcp = TcpStream::connect_timeout(&addr, self.connect_timeout)
            .map_err(|e| ConnectionError::Transport(format!("tcp connect failed: {e}")))?;
        tcp.set_read_timeout(Some(Duration::from_secs(30)))
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;
        tcp.set_write_timeout(Some(Duration::from_secs(30)))
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;
        tcp.set_nodelay(true)
            .map_err(|e| ConnectionError::Transport(e.to_string()))?;

        let stream = if use_tls {
            let connector = native_tls::TlsConnector::new()
                .map_err(|e| ConnectionError::Transport(format!("tls setup failed: {e}")))?;
            let tls = connector
                .connect(host, tcp)
                .map_err(|e| ConnectionError::Transport(format!("tls handshake failed: {e}")))?;
            MaybeTlsStream::NativeTls(tls)
        } else {
            MaybeTlsStream::Plain(tcp)
        };

        let (socket, _response) = tungstenite::client::client(self.url.as_str(), stream)
            .map_err(|e| ConnectionError::HandshakeFailed(format!("websocket upgrade: {e}")))?;

        set_read_timeout(&socket, self.poll_timeout)?;

        Ok(Box::new(WsTransport {
            socket,
            closed: false,
        }))
    }
}

/// Switch the underlying TCP stream to a short read timeout for polling.
fn set_read_timeout(
    socket: &WebSocket<MaybeTlsStream<TcpStream>>,
    timeout: Duration,
) -> Result<(), ConnectionError> {
    let tcp = match socket.get_ref() {
        MaybeTlsStream::Plain(tcp) => tcp,
        MaybeTlsStream::NativeTls(tls) => tls.get_ref(),
        _ => return Ok(()),
    };
    tcp.set_read_timeout(Some(timeout))
        .map_err(|e| ConnectionError::Transport(e.to_string()))
}

pub struct WsTransport {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

impl Transport for WsTransport {
    fn send(&mut self, frame: &str) -> Result<(), ConnectionError> {
        if self.closed {
            return Err(ConnectionError::TransportClosed);
        }
        self.socket
            .write(Message::Text(frame.into()))
            .map_err(map_ws_error)?;
        self.socket.flush().map_err(map_ws_error)
    }

    fn try_recv(&mut self) -> Result<Option<String>, ConnectionError> {
        if self.closed {
            return Err(ConnectionError::TransportClosed);
        }
        match self.socket.read() {
            Ok(Message::Text(text)) => Ok(Some(text.as_str().to_string())),
            Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                Ok(text) => Ok(Some(text)),
                Err(_) => {
                    log::warn!("ignoring non-UTF-8 binary frame");
                    Ok(None)
                }
            },
            Ok(Message::Close(_)) => {
                self.closed = true;
                Err(ConnectionError::TransportClosed)
            }
            // Ping/pong are answered by tungstenite internally.
            Ok(_) => Ok(None),
            Err(tungstenite::Error::Io(ref e))
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                Ok(None)
            }
            Err(e) => {
                self.closed = true;
                Err(map_ws_error(e))
            }
        }
    }

    fn close(&mut self) {
        if !self.closed {
            let _ = self.socket.close(None);
            let _ = self.socket.flush();
            self.closed = true;
        }
    }
}

fn map_ws_error(error: tungstenite::Error) -> ConnectionError {
    match error {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            ConnectionError::TransportClosed
        }
        other => ConnectionError::Transport(other.to_string()),
    }
}
