//! Upload operations.
//!
//! An upload is two phases: the bytes go to an upload shard as a hand-framed
//! multipart body, then the returned hash and size are committed under a
//! cloud path. Failures of the byte phase are reported as `Ok(None)`; commit
//! failures propagate.

use std::fs::File;
use std::path::Path;

use tracing::{debug, info, warn};

use super::utils::{normalize_dir, url_decode, url_encode};
use crate::error::{CloudError, Result};
use crate::fs::file::{LocalFile, RemoteFile};
use crate::fs::multipart::MultipartFrame;
use crate::progress::{ProgressReader, TransferProgress};
use crate::session::Session;
use crate::shard::{ShardInfo, ShardKind};

impl Session {
    /// Upload a file to a cloud directory.
    ///
    /// Name and size are taken from the local filesystem.
    ///
    /// # Arguments
    /// * `local_path` - Path to the local file to upload
    /// * `destination_dir` - Cloud directory, with or without trailing `/`
    ///
    /// # Returns
    /// * `Ok(Some(file))` once bytes and metadata are both stored.
    /// * `Ok(None)` if the shard did not accept the bytes. The cause is only
    ///   logged.
    ///
    /// # Errors
    /// Validation, authentication, shard lookup and commit failures.
    ///
    /// # Example
    /// ```no_run
    /// # use mailru_cloud::{Credentials, Session};
    /// # fn example() -> mailru_cloud::Result<()> {
    /// let mut session = Session::new(Credentials::new("user@mail.ru", "password"))?;
    /// match session.upload("report.pdf", "/Documents")? {
    ///     Some(file) => println!("Stored {} ({} bytes)", file.full_path(), file.size()),
    ///     None => eprintln!("Upload rejected"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn upload<P: AsRef<Path>>(
        &mut self,
        local_path: P,
        destination_dir: &str,
    ) -> Result<Option<RemoteFile>> {
        let local = LocalFile::from_path(local_path)?;
        self.upload_local(&local, destination_dir)
    }

    /// Upload a described local file to a cloud directory.
    ///
    /// `local.name` names the committed cloud file. The multipart header
    /// carries the file name of `local.path` on disk, so a renamed upload still
    /// reaches the shard under its real name.
    ///
    /// Same contract as [`upload`](Self::upload).
    pub fn upload_local(
        &mut self,
        local: &LocalFile,
        destination_dir: &str,
    ) -> Result<Option<RemoteFile>> {
        if local.name.is_empty() {
            return Err(CloudError::Validation("File name is empty".to_string()));
        }
        let destination = normalize_dir(destination_dir);

        self.ensure_authenticated()?;
        let shard = self.locate_shard(ShardKind::Upload)?;
        let disk_name = local
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| local.name.clone());
        let frame = MultipartFrame::with_random_boundary(&disk_name, local.size);

        let remote = match self.send_file(&shard, frame, local, &destination) {
            Ok(remote) => remote,
            Err(e) => {
                warn!(file = %local.name, error = %e, "upload to shard failed");
                return Ok(None);
            }
        };

        self.commit_metadata(&remote)?;
        Ok(Some(remote))
    }

    /// Stream the framed file to the shard and read back hash and size.
    fn send_file(
        &self,
        shard: &ShardInfo,
        frame: MultipartFrame,
        local: &LocalFile,
        destination: &str,
    ) -> Result<RemoteFile> {
        let login = self.login_name().unwrap_or_default();
        let url = format!("{}?cloud_domain=2&{}", shard.url, login);
        let referer = self.config().home_url(&url_encode(destination));
        let content_type = frame.content_type();
        let length = frame.content_length();

        let contents = File::open(&local.path)?;
        let body = ProgressReader::new(
            frame.into_reader(contents),
            TransferProgress::new(0, length, local.name.clone()),
            self.progress_callback(),
        );

        debug!(file = %local.name, size = local.size, length, "uploading to shard");
        let text = self
            .api
            .post_upload(&url, &referer, &content_type, body, length)?
            .ensure_ok()?
            .text()?;

        let (hash, echoed_size) = parse_upload_response(&text)?;
        if echoed_size != local.size {
            warn!(
                file = %local.name,
                local = local.size,
                echoed = echoed_size,
                "shard echoed a different size"
            );
        }

        let full_path = format!("{}{}", url_decode(destination), local.name);
        Ok(RemoteFile::new(local.name.clone(), full_path, hash, local.size))
    }

    /// Register uploaded bytes as a file in the cloud namespace.
    ///
    /// Existing files at the same path are overwritten.
    ///
    /// # Errors
    /// [`CloudError::Protocol`] if the server does not answer `200 OK`.
    pub fn commit_metadata(&mut self, file: &RemoteFile) -> Result<()> {
        self.ensure_authenticated()?;

        let fields = vec![
            ("home", file.full_path().to_string()),
            ("conflict", "rewrite".to_string()),
            ("api", "2".to_string()),
            ("token", self.csrf_token.clone()),
            ("hash", file.hash().to_string()),
            ("size", file.size().to_string()),
        ];
        let referer = self.config().home_url(&url_encode(file.parent_dir()));

        self.api.post_add_file(fields, &referer)?;
        info!(path = %file.full_path(), size = file.size(), "file committed");
        Ok(())
    }
}

/// Split a shard reply `"<hash>;<size>\r\n"`.
fn parse_upload_response(text: &str) -> Result<(String, u64)> {
    let mut parts = text.split(';');
    let hash = parts.next().unwrap_or_default().trim();
    let size = parts
        .next()
        .map(|s| s.trim_end_matches(['\r', '\n']))
        .ok_or_else(|| CloudError::Protocol(format!("Malformed upload response: {:?}", text)))?;

    if hash.is_empty() {
        return Err(CloudError::Protocol("Upload response has no hash".to_string()));
    }
    let size: u64 = size
        .parse()
        .map_err(|_| CloudError::Protocol(format!("Invalid size in upload response: {:?}", size)))?;

    Ok((hash.to_string(), size))
}
