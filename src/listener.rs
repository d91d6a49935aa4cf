//! The socket listener: one connection, one pass, no reconnect.
//!
//! Console text (confirmations, event blocks, error notices) is written to
//! the two sinks handed to [`Listener::new`]; diagnostics go through
//! `tracing`.

use std::future::Future;
use std::io::{self, Write};

use eyre::Result;
use futures_util::{pin_mut, StreamExt};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        error::{ProtocolError, UrlError},
        handshake::client::Request,
        Error as WsError, Message,
    },
};
use tracing::{debug, info, warn};

use crate::{
    display,
    error::{ConnectError, DecodeError},
    event::InboundEvent,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    /// Echo every payload instead of decoding it.
    pub raw: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The connection closed or failed after it was open.
    Closed,
    /// The connection never opened.
    ConnectFailed,
    /// The shutdown future fired and the connection was closed by us.
    Interrupted,
    /// The console went away (e.g. a closed pipe); the connection was dropped.
    OutputClosed,
}

pub struct Listener<O, E> {
    url: String,
    options: ListenerOptions,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Listener<O, E> {
    pub fn new(url: impl Into<String>, options: ListenerOptions, out: O, err: E) -> Self {
        Self {
            url: url.into(),
            options,
            out,
            err,
        }
    }

    pub fn into_sinks(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Connect and print frames until the connection closes or `shutdown`
    /// resolves.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> Result<Outcome> {
        match self.drive(shutdown).await {
            Err(e) if is_broken_pipe(&e) => {
                debug!("Console output closed, stopping");
                Ok(Outcome::OutputClosed)
            }
            other => other,
        }
    }

    async fn drive(&mut self, shutdown: impl Future<Output = ()>) -> Result<Outcome> {
        pin_mut!(shutdown);

        let url = self.url.clone();
        writeln!(self.out, "Connecting to {url}...")?;
        info!("Connecting to {url}");

        let request = match client_request(&url) {
            Ok(request) => request,
            Err(e) => {
                self.on_connect_error(e)?;
                return Ok(Outcome::ConnectFailed);
            }
        };

        let mut ws_stream = tokio::select! {
            res = connect_async(request) => match res {
                Ok((ws_stream, _)) => ws_stream,
                Err(e) => {
                    self.on_connect_error(ConnectError::classify(e))?;
                    return Ok(Outcome::ConnectFailed);
                }
            },
            _ = &mut shutdown => {
                self.on_interrupt()?;
                return Ok(Outcome::Interrupted);
            }
        };

        self.on_open()?;

        loop {
            tokio::select! {
                msg = ws_stream.next() => match msg {
                    Some(Ok(Message::Text(text))) => self.on_message(&text)?,
                    Some(Ok(Message::Binary(data))) => self.on_binary(&data)?,
                    Some(Ok(Message::Close(frame))) => {
                        debug!("Close frame from server: {frame:?}");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(
                        WsError::ConnectionClosed
                        | WsError::AlreadyClosed
                        | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake),
                    ))
                    | None => break,
                    Some(Err(e)) => {
                        self.on_error(&e.to_string())?;
                        break;
                    }
                },
                _ = &mut shutdown => {
                    self.on_interrupt()?;
                    if let Err(e) = ws_stream.close(None).await {
                        debug!("Error while closing connection: {e}");
                    }
                    return Ok(Outcome::Interrupted);
                }
            }
        }

        self.on_close()?;
        Ok(Outcome::Closed)
    }

    fn on_open(&mut self) -> Result<()> {
        info!("Connected to {}", self.url);
        writeln!(self.out, "✓ Connected to WebSocket server at {}", self.url)?;
        writeln!(self.out, "Waiting for token creation events...\n")?;
        Ok(())
    }

    fn on_message(&mut self, payload: &str) -> Result<()> {
        if self.options.raw {
            writeln!(self.out, "Received: {payload}")?;
            return Ok(());
        }

        match InboundEvent::decode(payload) {
            Ok(event) => self.show(&event),
            Err(e) => self.report_malformed(&e, payload),
        }
    }

    fn on_binary(&mut self, payload: &[u8]) -> Result<()> {
        if self.options.raw {
            writeln!(self.out, "Received: {}", String::from_utf8_lossy(payload))?;
            return Ok(());
        }

        match InboundEvent::decode_bytes(payload) {
            Ok(event) => self.show(&event),
            Err(e) => self.report_malformed(&e, &String::from_utf8_lossy(payload)),
        }
    }

    fn show(&mut self, event: &InboundEvent) -> Result<()> {
        write!(self.out, "{}", display::render(event))?;
        self.out.flush()?;
        Ok(())
    }

    fn report_malformed(&mut self, e: &DecodeError, payload: &str) -> Result<()> {
        warn!("Dropping malformed frame: {e}");
        writeln!(self.err, "Error parsing JSON: {e}")?;
        writeln!(self.err, "Raw message: {payload}")?;
        Ok(())
    }

    fn on_connect_error(&mut self, e: ConnectError) -> Result<()> {
        warn!("Could not connect to {}: {e}", self.url);
        match e {
            ConnectError::Refused(_) => writeln!(
                self.err,
                "✗ Connection refused. Is the server running on {}?",
                self.url
            )?,
            ConnectError::InvalidUrl(_) => {
                writeln!(self.err, "✗ Invalid WebSocket URL: {}", self.url)?
            }
            ConnectError::Transport(e) => writeln!(self.err, "✗ WebSocket error: {e}")?,
        }

        Ok(())
    }

    fn on_error(&mut self, message: &str) -> Result<()> {
        warn!("Transport error: {message}");
        writeln!(self.err, "✗ WebSocket error: {message}")?;
        Ok(())
    }

    fn on_close(&mut self) -> Result<()> {
        info!("Connection to {} closed", self.url);
        writeln!(self.out, "\n✗ Connection closed")?;
        Ok(())
    }

    fn on_interrupt(&mut self) -> Result<()> {
        info!("Interrupted, closing connection");
        writeln!(self.out, "\n\nClient stopped by user")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Build the handshake request, refusing anything but `ws://` and `wss://`
/// before a socket is opened.
fn client_request(url: &str) -> Result<Request, ConnectError> {
    let request = url.into_client_request().map_err(ConnectError::classify)?;
    match request.uri().scheme_str() {
        Some(scheme) if scheme.eq_ignore_ascii_case("ws") || scheme.eq_ignore_ascii_case("wss") => {
            Ok(request)
        }
        _ => Err(ConnectError::InvalidUrl(WsError::Url(
            UrlError::UnsupportedUrlScheme,
        ))),
    }
}

fn is_broken_pipe(e: &eyre::Report) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}
