use std::env;
use std::process;

use mailru_cloud::{CloudConfig, Credentials, Session};
use tracing_subscriber::{fmt, EnvFilter};

pub fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mailru_cloud=debug"));
    fmt().with_env_filter(filter).with_target(false).init();
}

pub struct Args {
    pub login: String,
    pub password: String,
    pub proxy: Option<String>,
    pub positionals: Vec<String>,
}

/// Parse `--login`, `--password` and `--proxy`; anything else is positional.
pub fn parse_args(usage: &'static str) -> Args {
    let mut login = None;
    let mut password = None;
    let mut proxy = None;
    let mut positionals = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--help" | "-h" => {
                println!("{usage}");
                process::exit(0);
            }
            "--login" | "-l" => Some(&mut login),
            "--password" | "-p" => Some(&mut password),
            "--proxy" => Some(&mut proxy),
            _ => None,
        };
        match slot {
            Some(slot) => *slot = Some(args.next().unwrap_or_else(|| usage_and_exit(usage))),
            None => positionals.push(arg),
        }
    }

    match (login, password) {
        (Some(login), Some(password)) => Args {
            login,
            password,
            proxy,
            positionals,
        },
        _ => usage_and_exit(usage),
    }
}

impl Args {
    pub fn session(&self) -> mailru_cloud::Result<Session> {
        let mut config = CloudConfig::default();
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy);
        }
        Session::with_config(Credentials::new(&self.login, &self.password), config)
    }
}
