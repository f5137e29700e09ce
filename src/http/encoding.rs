//! Content codings applied to response bodies.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

/// Name of the gzip coding as it appears in Accept-Encoding and
/// Content-Encoding.
pub const GZIP: &str = "gzip";

/// Compresses `data` into a complete gzip member.
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
