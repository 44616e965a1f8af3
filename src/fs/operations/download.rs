//! Download operations.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use super::utils::{file_name_of, strip_leading_slash};
use crate::error::Result;
use crate::progress::{ProgressReader, TransferProgress};
use crate::session::Session;
use crate::shard::ShardKind;

impl Session {
    /// Download a cloud file into memory.
    ///
    /// The whole body is buffered; use [`download_to`](Self::download_to) for
    /// large files.
    ///
    /// # Errors
    /// [`CloudError::Protocol`](crate::CloudError::Protocol) if the shard does
    /// not answer `200 OK`, plus any authentication, shard lookup or transport
    /// error.
    pub fn download(&mut self, remote_path: &str) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.download_to(remote_path, &mut buffer)?;
        Ok(buffer)
    }

    /// Stream a cloud file into a writer.
    ///
    /// # Returns
    /// Number of bytes written.
    pub fn download_to<W: Write + ?Sized>(
        &mut self,
        remote_path: &str,
        writer: &mut W,
    ) -> Result<u64> {
        self.ensure_authenticated()?;
        let shard = self.locate_shard(ShardKind::Get)?;

        let url = format!("{}{}", shard.url, strip_leading_slash(remote_path));
        let response = self.api.get_file(&url)?;
        let total = response.content_length().unwrap_or(0);
        debug!(path = remote_path, total, "downloading from shard");

        let mut body = ProgressReader::new(
            response.into_body(),
            TransferProgress::new(0, total, file_name_of(remote_path)),
            self.progress_callback(),
        );
        let written = std::io::copy(&mut body, writer)?;

        info!(path = remote_path, bytes = written, "download complete");
        Ok(written)
    }

    /// Download a cloud file to local disk.
    ///
    /// A partially written file is removed on failure.
    pub fn download_to_file<P: AsRef<Path>>(
        &mut self,
        remote_path: &str,
        local_path: P,
    ) -> Result<u64> {
        let local_path = local_path.as_ref();
        let mut writer = BufWriter::new(File::create(local_path)?);

        let result = self
            .download_to(remote_path, &mut writer)
            .and_then(|written| {
                writer.flush()?;
                Ok(written)
            });

        if result.is_err() {
            drop(writer);
            let _ = fs::remove_file(local_path);
        }
        result
    }
}
