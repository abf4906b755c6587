//! rover-cli - interactive console for the vehicle link
//!
//! Usage:
//!   rover-cli --target 192.168.1.50:9000
//!   rover-cli --preset rover
//!
//! Console commands:
//!   connect <host:port>   open a connection (supersedes the current one)
//!   disconnect            close the connection
//!   hold <cmd> [ms]       start repeating a command while "held"
//!   release [cmd]         cancel the repeat, optionally send a follow-up
//!   status                print the link state
//!   quit                  exit
//!   anything else         sent verbatim as a command frame

use anyhow::Result;
use clap::Parser;
use rover_link::cli::Cli;
use rover_link::{
    commands, LinkConfig, LinkEvent, LinkManager, RepeatHandle, Target, TcpConnector,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "rover_link=debug,rover_cli=debug"
    } else {
        "rover_link=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("rover-link.toml"));
    let config = LinkConfig::load(&config_path)?;

    // Resolve the startup target before building the manager so a bad
    // preset fails fast instead of after the console is up
    let initial = match (&cli.target, &cli.preset) {
        (Some(addr), _) => Some(Target::new(addr.clone())),
        (None, Some(name)) => match config.targets.get(name) {
            Some(addr) => Some(Target::named(addr.clone(), name.clone())),
            None => anyhow::bail!("preset '{}' not found in {}", name, config_path.display()),
        },
        (None, None) => None,
    };

    let link = LinkManager::with_config(TcpConnector::new(), config);
    let mut events = link.subscribe();

    if let Some(target) = initial {
        link.connect(target).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut hold = RepeatHandle::finished();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,

            event = events.recv() => {
                if let Some(event) = event {
                    print_event(&event);
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if !handle_command(&link, &mut hold, line).await {
                    break;
                }
            }
        }
    }

    hold.cancel();
    link.disconnect();
    Ok(())
}

/// Dispatch one console line; returns `false` to exit
async fn handle_command(
    link: &LinkManager<TcpConnector>,
    hold: &mut RepeatHandle,
    line: &str,
) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("quit") | Some("exit") => return false,

        Some("connect") => match parts.next() {
            Some(addr) => {
                link.connect(Target::new(addr)).await;
            }
            None => eprintln!("usage: connect <host:port>"),
        },

        Some("disconnect") => link.disconnect(),

        Some("status") => println!("{}", link.state()),

        Some("hold") => match parts.next() {
            Some(cmd) => {
                // One gesture at a time: cancel before starting the next
                hold.cancel();
                *hold = match parts.next().and_then(|ms| ms.parse::<u64>().ok()) {
                    Some(ms) => link.start_repeat(cmd, Duration::from_millis(ms)),
                    None => link.start_drive_repeat(cmd),
                };
            }
            None => eprintln!("usage: hold <command> [interval-ms]"),
        },

        Some("release") => {
            hold.cancel();
            if let Some(follow_up) = parts.next() {
                link.send(follow_up).await;
            }
        }

        Some(_) => {
            if !link.send(line).await {
                eprintln!("not connected, command dropped");
            }
        }

        None => {}
    }
    true
}

fn print_event(event: &LinkEvent) {
    match event {
        LinkEvent::Connected { peer } => println!("== connected to {}", peer),
        LinkEvent::ConnectFailed { peer } => println!("== could not connect to {}", peer),
        LinkEvent::Disconnected => println!("== disconnected"),
        LinkEvent::MessageSent { text } => println!(">> {}", text),
        LinkEvent::MessageReceived { text } => match commands::host_ip(text) {
            Some(addr) => println!("<< video feed at http://{}/", addr),
            None => println!("<< {}", text),
        },
    }
}
