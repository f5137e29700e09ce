/// HTTP status codes the server answers with.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): Upload stored
/// - `BadRequest` (400): Missing header or oversized request
/// - `NotFound` (404): Unknown route or missing file
/// - `InternalServerError` (500): Server-side failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use rawhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Created.as_u16(), 201);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
///
/// Headers are kept in insertion order and serialized exactly as stored; no
/// header is ever added implicitly.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// ```
/// # use rawhttpd::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .connection(false)
///     .sized_body(b"abc".to_vec())
///     .build();
///
/// assert_eq!(response.header("Connection"), Some("open"));
/// assert_eq!(response.header("Content-Length"), Some("3"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Appends a header, or replaces the value in place if the name is
    /// already present.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Adds `Connection: close` when closing, `Connection: open` otherwise.
    pub fn connection(self, close: bool) -> Self {
        self.header("Connection", if close { "close" } else { "open" })
    }

    /// Sets the body without announcing its length.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets the body and appends a matching Content-Length header.
    pub fn sized_body(self, body: Vec<u8>) -> Self {
        let len = body.len();
        self.header("Content-Length", len.to_string()).body(body)
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Bare `404 Not Found`: no headers, no body.
    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound).build()
    }

    /// `400 Bad Request` carrying only a Connection header.
    pub fn bad_request(close: bool) -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .connection(close)
            .build()
    }

    /// `500 Internal Server Error` carrying only a Connection header.
    pub fn internal_error(close: bool) -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError)
            .connection(close)
            .build()
    }

    /// Looks up a header by exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
