//! Example: Login to a Mail.ru Cloud account
//!
//! Usage:
//!   cargo run --example login -- --login YOUR_LOGIN --password YOUR_PASSWORD [--proxy PROXY]

mod cli;

use cli::{init_tracing, parse_args, usage_and_exit};

const USAGE: &str =
    "Usage: cargo run --example login -- --login LOGIN --password PASSWORD [--proxy PROXY]";

fn main() {
    init_tracing();
    let args = parse_args(USAGE);
    if !args.positionals.is_empty() {
        usage_and_exit(USAGE);
    }

    println!("Logging in as: {}", args.login);

    let result = args.session().and_then(|mut session| {
        let ok = session.login()?;
        Ok((session, ok))
    });

    match result {
        Ok((session, true)) => {
            println!("Login successful!");
            println!("State: {:?}", session.auth_state());
        }
        Ok((_, false)) => {
            eprintln!("Login rejected: the server set no session cookies or token");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Login failed: {}", e);
            std::process::exit(1);
        }
    }
}
