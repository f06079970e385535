use std::io::{Read, Write};

use bytes::Bytes;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::ConnectError;

/// Body compression algorithms understood by both clients and handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Identity,
    Gzip,
}

impl Compression {
    pub fn name(&self) -> &'static str {
        match self {
            | Compression::Identity => "identity",
            | Compression::Gzip => "gzip",
        }
    }

    /// Resolves a `content-encoding` value. An absent or empty header means
    /// `identity`.
    pub fn from_name(name: &str) -> Option<Compression> {
        match name.trim() {
            | "" | "identity" => Some(Compression::Identity),
            | "gzip" => Some(Compression::Gzip),
            | _ => None,
        }
    }

    /// Picks the first encoding of an `accept-encoding` header that is also in
    /// `supported`. Quality values are ignored, order expresses preference.
    pub fn negotiate(
        accept_encoding: &str,
        supported: &[Compression],
    ) -> Option<Compression> {
        accept_encoding
            .split(',')
            .filter_map(|token| token.split(';').next())
            .filter_map(Compression::from_name)
            .find(|c| *c != Compression::Identity && supported.contains(c))
    }

    pub fn compress(&self, data: &[u8]) -> Result<Bytes, ConnectError> {
        match self {
            | Compression::Identity => Ok(Bytes::copy_from_slice(data)),
            | Compression::Gzip => {
                let mut encoder =
                    GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder
                    .write_all(data)
                    .and_then(|_| encoder.finish())
                    .map(Bytes::from)
                    .map_err(|e| {
                        ConnectError::internal(format!(
                            "compress with gzip: {e}"
                        ))
                    })
            }
        }
    }

    /// Decompresses `data`, refusing to produce more than `max_bytes`.
    pub fn decompress(
        &self,
        data: Bytes,
        max_bytes: usize,
    ) -> Result<Bytes, ConnectError> {
        match self {
            | Compression::Identity => Ok(data),
            | Compression::Gzip => {
                let mut out = Vec::new();
                // Read one byte past the limit to detect oversized payloads
                // without inflating the whole thing.
                let limit = max_bytes as u64 + 1;
                GzDecoder::new(&data[..])
                    .take(limit)
                    .read_to_end(&mut out)
                    .map_err(|e| {
                        ConnectError::invalid_argument(format!(
                            "decompress with gzip: {e}"
                        ))
                    })?;
                if out.len() > max_bytes {
                    return Err(ConnectError::resource_exhausted(format!(
                        "decompressed message size is larger than configured \
                         max {max_bytes}"
                    )));
                }
                Ok(Bytes::from(out))
            }
        }
    }
}
