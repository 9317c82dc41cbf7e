use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{
    view::render_lines, ClientConfig, HttpTaskApi, TaskListController, TaskListSnapshot,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod dispatch;

use commands::{parse_command, ShellCommand};
use dispatch::{dispatch, Step};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = ClientConfig::new(&args.server_url)?
        .with_request_timeout(Duration::from_secs(args.timeout_secs));
    let controller = TaskListController::new(Arc::new(HttpTaskApi::new(config)?));

    tokio::spawn(render_changes(controller.clone(), controller.subscribe()));
    dispatch(&controller, ShellCommand::Reload);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        debug!(?command, "shell command");

        match dispatch(&controller, command) {
            Step::Quit => break,
            Step::Notice(message) => println!("{message}"),
            Step::Idle | Step::Started(_) => {}
        }
    }

    Ok(())
}

async fn render_changes(
    controller: Arc<TaskListController>,
    mut events: broadcast::Receiver<TaskListSnapshot>,
) {
    let mut last_lines = Vec::new();
    loop {
        match events.recv().await {
            Ok(snapshot) => {
                let lines = render_lines(&snapshot);
                if lines != last_lines {
                    print_lines(&lines);
                    last_lines = lines;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "renderer fell behind; showing latest state");
                let lines = render_lines(&controller.snapshot());
                print_lines(&lines);
                last_lines = lines;
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_lines(lines: &[String]) {
    println!("--");
    for line in lines {
        println!("{line}");
    }
}
