//! Transfer operations split into focused modules.

mod download;
mod upload;
mod utils;
