//! Example: Upload a file
//!
//! Usage:
//!   cargo run --example upload -- --login LOGIN --password PASSWORD [--proxy PROXY] <LOCAL_FILE> <REMOTE_DIR>

mod cli;

use cli::{init_tracing, parse_args, usage_and_exit};
use std::process;

const USAGE: &str = "Usage: cargo run --example upload -- --login LOGIN --password PASSWORD [--proxy PROXY] <LOCAL_FILE> <REMOTE_DIR>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = parse_args(USAGE);
    if args.positionals.len() != 2 {
        usage_and_exit(USAGE);
    }
    let local_file = &args.positionals[0];
    let remote_dir = &args.positionals[1];

    let mut session = args.session()?;

    println!("Uploading {} to {}...", local_file, remote_dir);
    match session.upload(local_file, remote_dir) {
        Ok(Some(file)) => {
            println!("Upload complete!");
            println!("Stored: {} ({} bytes, hash {})", file.full_path(), file.size(), file.hash());
        }
        Ok(None) => {
            eprintln!("Upload rejected by the storage node (see log for details)");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    Ok(())
}
