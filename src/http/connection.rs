use std::sync::Arc;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::ServerConfig;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::router::Router;
use crate::http::writer::ResponseWriter;

/// One client connection and the request/response cycle running on it.
pub struct Connection {
    stream: TcpStream,
    router: Arc<Router>,
    /// Bytes received but not yet consumed by a request.
    buffer: BytesMut,
    chunk: Vec<u8>,
    max_request_size: usize,
    read_timeout: Option<Duration>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

/// What a read attempt produced.
enum Incoming {
    Request(Request),
    Malformed(ParseError),
    TooLarge,
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, router: Arc<Router>, cfg: &ServerConfig) -> Self {
        Self {
            stream,
            router,
            buffer: BytesMut::with_capacity(cfg.read_buffer_size),
            chunk: vec![0; cfg.read_buffer_size],
            max_request_size: cfg.max_request_size,
            read_timeout: cfg.read_timeout(),
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Incoming::Request(req) => ConnectionState::Processing(req),
                        Incoming::Malformed(e) => {
                            tracing::debug!(error = ?e, "Unparseable request");
                            ConnectionState::Writing(
                                ResponseWriter::new(&Response::not_found()),
                                false,
                            )
                        }
                        Incoming::TooLarge => {
                            tracing::warn!(
                                limit = self.max_request_size,
                                "Request exceeds size limit"
                            );
                            ConnectionState::Writing(
                                ResponseWriter::new(&Response::bad_request(true)),
                                false,
                            )
                        }
                        Incoming::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let (response, keep_alive) = self.router.dispatch(req).await;

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading;
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    if let Err(e) = self.stream.shutdown().await {
                        tracing::debug!(error = %e, "Shutdown after close failed");
                    }
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_request(&mut self) -> anyhow::Result<Incoming> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Incoming::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    if self.buffer.len() >= self.max_request_size {
                        return Ok(Incoming::TooLarge);
                    }
                }

                Err(e) => return Ok(Incoming::Malformed(e)),
            }

            let n = match self.read_timeout {
                Some(limit) => match timeout(limit, self.stream.read(&mut self.chunk)).await {
                    Ok(res) => res?,
                    Err(_) => {
                        tracing::warn!(
                            timeout_secs = limit.as_secs(),
                            "Closing idle connection"
                        );
                        return Ok(Incoming::Closed);
                    }
                },
                None => self.stream.read(&mut self.chunk).await?,
            };

            if n == 0 {
                if !self.buffer.is_empty() {
                    tracing::debug!(
                        pending = self.buffer.len(),
                        "Peer closed with a partial request buffered"
                    );
                }
                return Ok(Incoming::Closed);
            }

            self.buffer.extend_from_slice(&self.chunk[..n]);
        }
    }
}
