//! Responders for each route.
//!
//! Every responder receives `close`, the client's `Connection: close` wish,
//! and echoes it in the response's Connection header. Failures are turned
//! into status codes here and never propagate further.

use crate::fs::{FileError, FileStore};
use crate::http::encoding::{self, GZIP};
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// `GET /files/<name>`: the file's bytes, or a bare 404.
pub async fn serve_file(store: &FileStore, name: &str, close: bool) -> Response {
    match store.read(name).await {
        Ok(contents) => ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "application/octet-stream")
            .connection(close)
            .sized_body(contents)
            .build(),
        Err(FileError::NoDirectory) => {
            tracing::error!(file = name, "GET /files requested but no directory is configured");
            Response::internal_error(close)
        }
        Err(e) => {
            tracing::debug!(file = name, error = %e, "File not served");
            Response::not_found()
        }
    }
}

/// `POST /files/<name>`: stores the request body and answers 201.
pub async fn upload_file(store: &FileStore, name: &str, body: &[u8], close: bool) -> Response {
    match store.write(name, body).await {
        Ok(()) => {
            tracing::info!(file = name, bytes = body.len(), "File stored");
            ResponseBuilder::new(StatusCode::Created)
                .connection(close)
                .build()
        }
        Err(FileError::InvalidName) => Response::not_found(),
        Err(e) => {
            tracing::error!(file = name, error = %e, "Failed to store uploaded file");
            Response::internal_error(close)
        }
    }
}

/// `GET /user-agent`: the User-Agent token as plain text.
pub fn user_agent(request: &Request, close: bool) -> Response {
    match request.user_agent() {
        Some(agent) => ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .connection(close)
            .sized_body(agent.as_bytes().to_vec())
            .build(),
        None => Response::bad_request(close),
    }
}

/// `GET /echo/<value>`: the value back, gzip-encoded when the client lists
/// `gzip` in Accept-Encoding.
///
/// An Accept-Encoding header without `gzip` yields a response with neither a
/// body nor a Content-Length.
pub fn echo(request: &Request, value: &str, close: bool) -> Response {
    match request.accepts_encoding(GZIP) {
        None => ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .connection(close)
            .sized_body(value.as_bytes().to_vec())
            .build(),
        Some(false) => ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .connection(close)
            .build(),
        Some(true) => match encoding::gzip(value.as_bytes()) {
            Ok(compressed) => ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Encoding", GZIP)
                .header("Content-Type", "text/plain")
                .connection(close)
                .sized_body(compressed)
                .build(),
            Err(e) => {
                tracing::error!(error = %e, "gzip encoding failed");
                Response::internal_error(close)
            }
        },
    }
}

/// `GET /`: empty 200. The Connection header only appears when closing.
pub fn root(close: bool) -> Response {
    let builder = ResponseBuilder::new(StatusCode::Ok);
    if close {
        builder.header("Connection", "close").build()
    } else {
        builder.build()
    }
}
