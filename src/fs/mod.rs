//! Cloud files and transfer operations.

pub(crate) mod file;
pub mod multipart;
mod operations;

pub use file::{LocalFile, RemoteFile};
pub use multipart::MultipartFrame;
