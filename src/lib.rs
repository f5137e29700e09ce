//! rawhttpd - a minimal HTTP/1.1 server on raw TCP sockets
//!
//! Serves files from a base directory, accepts uploads, echoes path values
//! (optionally gzip-encoded) and reports the client's User-Agent.

pub mod config;
pub mod fs;
pub mod http;
pub mod server;
