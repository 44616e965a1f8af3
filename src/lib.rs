//! # mailru_cloud
//!
//! Rust client library for Mail.ru Cloud storage.
//!
//! ## Features
//!
//! - **Authentication**: Login with login name/password, cookie persistence,
//!   CSRF token acquisition and lazy re-authentication before every operation.
//! - **Shard discovery**: Every transfer asks the dispatcher for a fresh
//!   storage node for its operation kind.
//! - **File Transfers**:
//!   - Upload from disk as a streamed multipart body, then commit the
//!     server hash and size under a cloud path.
//!   - Download into memory, any writer, or a local file.
//!   - Progress tracking with custom callbacks.
//!
//! All calls block the calling thread. A [`Session`] is a single account and
//! runs one operation at a time.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use mailru_cloud::{Credentials, Session};
//!
//! # fn example() -> mailru_cloud::Result<()> {
//! let mut session = Session::new(Credentials::new("user@mail.ru", "password"))?;
//!
//! // Upload a file; `None` means the shard rejected the bytes
//! if let Some(file) = session.upload("local_file.txt", "/Backups")? {
//!     println!("{} -> {}", file.full_path(), file.hash());
//! }
//!
//! // Download it back
//! let bytes = session.download("/Backups/local_file.txt")?;
//! println!("{} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod progress;
pub mod session;
pub mod shard;

// Re-export commonly used types
pub use config::CloudConfig;
pub use error::{CloudError, Result};
pub use fs::{LocalFile, MultipartFrame, RemoteFile};
pub use http::{HttpClient, HttpRequest, HttpResponse, RequestBody, Transport};
pub use progress::{ProgressCallback, TransferProgress};
pub use session::{AuthState, Credentials, Session};
pub use shard::{ShardInfo, ShardKind};
