use std::collections::HashMap;

/// HTTP request methods.
///
/// Every method is tokenized, but only GET and POST are routed; the rest fall
/// through to 404 Not Found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
}

/// A tokenized HTTP request.
///
/// Header names are stored lowercased, so lookups through
/// [`Request::header`] ignore ASCII case.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request target exactly as sent (e.g., "/echo/abc")
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    pub headers: HashMap<String, String>,
    /// Exactly `Content-Length` bytes of entity, empty when the header is absent
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Matching is case-sensitive.
    ///
    /// ```
    /// # use rawhttpd::http::request::Method;
    /// assert_eq!(Method::from_str("POST"), Some(Method::POST));
    /// assert_eq!(Method::from_str("post"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key: String = key.into();
        self.headers.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// True when the Connection header lists the `close` option.
    ///
    /// HTTP/1.1 connections otherwise stay open for the next request.
    pub fn wants_close(&self) -> bool {
        self.header("Connection")
            .map(|v| v.split(',').any(|opt| opt.trim().eq_ignore_ascii_case("close")))
            .unwrap_or(false)
    }

    /// The User-Agent token: the header value up to its first space.
    pub fn user_agent(&self) -> Option<&str> {
        self.header("User-Agent")
            .map(|v| v.split(' ').next().unwrap_or_default())
    }

    /// Checks the Accept-Encoding header for `coding`.
    ///
    /// `None` when the header is absent. Otherwise the value is split on `", "`
    /// and compared token by token, case-sensitively; quality values and
    /// wildcards are not interpreted.
    pub fn accepts_encoding(&self, coding: &str) -> Option<bool> {
        self.header("Accept-Encoding")
            .map(|v| v.split(", ").any(|token| token == coding))
    }
}
