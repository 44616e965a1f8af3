//! Storage shard discovery.
//!
//! The dispatcher hands out a storage node per operation kind. Shards are
//! looked up fresh for every transfer and never cached.

use tracing::debug;

use crate::error::{CloudError, Result};
use crate::session::Session;

/// Operation a shard serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardKind {
    /// Receives multipart uploads.
    Upload,
    /// Serves file contents.
    Get,
}

impl ShardKind {
    /// Key of this kind in the dispatcher response.
    pub fn label(&self) -> &'static str {
        match self {
            ShardKind::Upload => "upload",
            ShardKind::Get => "get",
        }
    }
}

/// A storage node chosen for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardInfo {
    pub kind: ShardKind,
    /// Absolute base URL of the node.
    pub url: String,
    /// Advisory capacity reported by the dispatcher.
    pub count: u64,
}

impl Session {
    /// Ask the dispatcher for a shard serving `kind`.
    ///
    /// Always takes the first candidate listed for the kind.
    ///
    /// # Errors
    /// [`CloudError::Protocol`] if the dispatcher fails or lists no candidate
    /// for `kind`, plus any error of
    /// [`ensure_authenticated`](Session::ensure_authenticated).
    pub fn locate_shard(&mut self, kind: ShardKind) -> Result<ShardInfo> {
        self.ensure_authenticated()?;

        let mut response = self.api.get_dispatcher(&self.csrf_token)?;
        let entry = response
            .body
            .remove(kind.label())
            .and_then(|entries| entries.into_iter().next())
            .ok_or_else(|| {
                CloudError::Protocol(format!("Dispatcher returned no {} shard", kind.label()))
            })?;

        debug!(kind = kind.label(), url = %entry.url, count = entry.count, "shard located");
        Ok(ShardInfo {
            kind,
            url: entry.url,
            count: entry.count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ShardKind::Upload.label(), "upload");
        assert_eq!(ShardKind::Get.label(), "get");
    }
}
