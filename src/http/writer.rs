use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::http::response::Response;

/// Renders the response as raw HTTP/1.1 bytes, headers in stored order and
/// nothing added.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let head = resp
        .headers
        .iter()
        .fold(
            format!("HTTP/1.1 {} {}\r\n", resp.status.as_u16(), resp.status.reason_phrase()),
            |mut head, (name, value)| {
                head.push_str(name);
                head.push_str(": ");
                head.push_str(value);
                head.push_str("\r\n");
                head
            },
        );

    let mut buf = Vec::with_capacity(head.len() + 2 + resp.body.len());
    buf.extend_from_slice(head.as_bytes());
    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(&resp.body);
    buf
}

/// A response rendered up front, so it goes out in one piece.
pub struct ResponseWriter {
    bytes: Vec<u8>,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            bytes: serialize_response(response),
        }
    }

    pub async fn write_to_stream(&self, stream: &mut TcpStream) -> anyhow::Result<()> {
        stream.write_all(&self.bytes).await?;
        stream.flush().await?;
        tracing::trace!(bytes = self.bytes.len(), "Response written");
        Ok(())
    }
}
