//! HTTP/1.1 request/response handling.
//!
//! - **`connection`**: per-connection request/response state machine
//! - **`parser`**: tokenizes incoming bytes into a [`request::Request`]
//! - **`request`**: request representation and header lookups
//! - **`router`**: classifies requests by method and path prefix
//! - **`handlers`**: one responder per route
//! - **`response`**: ordered-header responses and their builder
//! - **`writer`**: serializes and writes responses to the client
//! - **`encoding`**: gzip content coding
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for a complete request
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route and build the response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close / unmatched route → Closed
//! ```
//!
//! Unparseable requests skip Processing and are answered with a bare
//! `404 Not Found` before the connection closes.

pub mod connection;
pub mod encoding;
pub mod handlers;
pub mod parser;
pub mod request;
pub mod response;
pub mod router;
pub mod writer;
