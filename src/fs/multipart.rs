//! Multipart body framing for shard uploads.
//!
//! The shard wants a single `file` part with a declared content length, so the
//! body is framed by hand as header bytes, raw file bytes, closing bytes. The
//! boundary token is four dashes followed by a UUID; boundary lines in the
//! body add the usual two more.

use std::io::{Cursor, Read};

use uuid::Uuid;

/// Framing for one multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFrame {
    boundary: String,
    header: Vec<u8>,
    closing: Vec<u8>,
    file_size: u64,
}

impl MultipartFrame {
    /// Frame a file of `file_size` bytes under `boundary`.
    pub fn new(boundary: &str, file_name: &str, file_size: u64) -> Self {
        let header = format!(
            "------{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            boundary, file_name
        );
        let closing = format!("\r\n------{}--\r\n", boundary);

        Self {
            boundary: boundary.to_string(),
            header: header.into_bytes(),
            closing: closing.into_bytes(),
            file_size,
        }
    }

    /// Frame with a fresh random boundary.
    pub fn with_random_boundary(file_name: &str, file_size: u64) -> Self {
        Self::new(&Uuid::new_v4().to_string(), file_name, file_size)
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Bytes sent before the file contents.
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Bytes sent after the file contents.
    pub fn closing(&self) -> &[u8] {
        &self.closing
    }

    /// Exact body length: header, file and closing.
    pub fn content_length(&self) -> u64 {
        self.header.len() as u64 + self.file_size + self.closing.len() as u64
    }

    /// Value of the `Content-Type` request header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary=----{}", self.boundary)
    }

    /// Chain the three segments into one body reader.
    ///
    /// At most `file_size` bytes are taken from `contents`.
    pub fn into_reader<R>(self, contents: R) -> impl Read + Send + 'static
    where
        R: Read + Send + 'static,
    {
        Cursor::new(self.header)
            .chain(contents.take(self.file_size))
            .chain(Cursor::new(self.closing))
    }
}
