use crate::fs::FileStore;
use crate::http::handlers;
use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// Which responder a request is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Files,
    UserAgent,
    Echo,
    Upload,
    Root,
    Unmatched,
}

/// Classifies a request by method and path prefix.
///
/// Prefixes are checked in a fixed priority order, so `/filesystem` is still
/// a Files request and `/echoes` an Echo request.
pub fn classify(request: &Request) -> Route {
    let path = request.path.as_str();
    match request.method {
        Method::GET if path.starts_with("/files") => Route::Files,
        Method::GET if path.starts_with("/user-agent") => Route::UserAgent,
        Method::GET if path.starts_with("/echo") => Route::Echo,
        Method::POST if path.starts_with("/files") => Route::Upload,
        Method::GET if path == "/" => Route::Root,
        _ => Route::Unmatched,
    }
}

/// The file name of a `/files/<name>` path, empty if none was given.
fn file_name(path: &str) -> &str {
    path.strip_prefix("/files/").unwrap_or_default()
}

/// The echoed value of a `/echo/<value>` path.
fn echo_value(path: &str) -> &str {
    let rest = path.strip_prefix("/echo").unwrap_or_default();
    rest.strip_prefix('/').unwrap_or(rest)
}

pub struct Router {
    files: FileStore,
}

impl Router {
    pub fn new(files: FileStore) -> Self {
        Self { files }
    }

    /// Produces the response for `request` and whether the connection may
    /// serve another request afterwards.
    pub async fn dispatch(&self, request: &Request) -> (Response, bool) {
        let close = request.wants_close();
        let route = classify(request);

        let response = match route {
            Route::Files => handlers::serve_file(&self.files, file_name(&request.path), close).await,
            Route::UserAgent => handlers::user_agent(request, close),
            Route::Echo => handlers::echo(request, echo_value(&request.path), close),
            Route::Upload => {
                handlers::upload_file(&self.files, file_name(&request.path), &request.body, close)
                    .await
            }
            Route::Root => handlers::root(close),
            Route::Unmatched => Response::not_found(),
        };

        tracing::debug!(
            method = ?request.method,
            path = %request.path,
            route = ?route,
            status = response.status.as_u16(),
            "Request handled"
        );

        let keep_alive = route != Route::Unmatched && !close;
        (response, keep_alive)
    }
}
