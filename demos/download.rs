//! Example: Download a file
//!
//! Usage:
//!   cargo run --example download -- --login LOGIN --password PASSWORD [--proxy PROXY] <REMOTE_PATH> <LOCAL_PATH>

mod cli;

use cli::{init_tracing, parse_args, usage_and_exit};
use indicatif::{ProgressBar, ProgressStyle};
use mailru_cloud::progress::TransferProgress;
use mailru_cloud::Result;

const USAGE: &str = "Usage: cargo run --example download -- --login LOGIN --password PASSWORD [--proxy PROXY] <REMOTE_PATH> <LOCAL_PATH>";

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args(USAGE);
    if args.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let remote_path = args.positionals[0].clone();
    let local_path = args.positionals[1].clone();

    let mut session = args.session()?;

    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    let progress_bar_for_cb = progress_bar.clone();
    session.watch_status(Box::new(move |progress: &TransferProgress| {
        if progress.total > 0 {
            progress_bar_for_cb.set_length(progress.total);
            progress_bar_for_cb.set_position(progress.done.min(progress.total));
        } else {
            progress_bar_for_cb.set_length(progress.done.max(1));
            progress_bar_for_cb.set_position(progress.done);
        }
        progress_bar_for_cb.set_message(progress.filename.clone());
    }));

    println!("Downloading {} to {}", remote_path, local_path);
    let written = session.download_to_file(&remote_path, &local_path)?;
    progress_bar.finish_with_message("complete");

    println!("Download complete! {} bytes", written);

    Ok(())
}
