use std::env;
use std::path::PathBuf;

use devtinder_core::config::Config;

mod forms;
mod keys;
mod logging;
mod ui;
mod worker;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args(env::args().skip(1).collect())?;
    match options.command {
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            println!("devtinder {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Tui => {
            let mut config = Config::load(&config_path())?.with_env_overrides();
            if let Some(base_url) = options.base_url {
                config.api.base_url = base_url;
            }
            let log_path = logging::init()?;
            tracing::info!(base_url = %config.base_url(), log = %log_path.display(), "starting");
            ui::run(config)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Tui,
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    command: Command,
    base_url: Option<String>,
}

fn parse_args(args: Vec<String>) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options {
        command: Command::Tui,
        base_url: None,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "tui" => i += 1,
            "--help" | "-h" | "help" => {
                options.command = Command::Help;
                i += 1;
            }
            "--version" | "-V" | "version" => {
                options.command = Command::Version;
                i += 1;
            }
            "--base-url" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--base-url requires a URL".into());
                };
                options.base_url = Some(value.clone());
                i += 2;
            }
            other => {
                print_help();
                return Err(format!("unsupported argument: {other}").into());
            }
        }
    }
    Ok(options)
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devtinder")
        .join("config.toml")
}

fn print_help() {
    println!(
        "devtinder {}\n\nUsage:\n  devtinder [tui] [--base-url URL]\n  devtinder --help\n  devtinder --version\n\nConfig:\n  {}\n  DEVTINDER_BASE_URL overrides the backend URL\n  RUST_LOG / LOG_FORMAT=json control the log file",
        env!("CARGO_PKG_VERSION"),
        config_path().display()
    );
}
