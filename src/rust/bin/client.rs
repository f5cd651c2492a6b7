use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use log::info;
use tokenclass::client::{DEFAULT_SERVER_URL, INPUT_PLACEHOLDER};
use tokenclass::{init_logger, render, render_error, DisplayMode, ProcessClient};

#[derive(Parser)]
#[command(author, version, about = "Sends JSON token lists to the classification server", long_about = None)]
struct Args {
    /// Base URL of the classification server
    #[arg(long, env = "TOKENCLASS_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    url: String,

    /// Which result fields to show
    #[arg(short, long, value_enum, default_value_t = DisplayMode::AlphabetsAndNumbers)]
    mode: DisplayMode,

    /// Process this JSON once and exit instead of prompting
    #[arg(short, long)]
    input: Option<String>,

    /// Print debug logs
    #[arg(short, long)]
    verbose: bool,
}

async fn process_once(client: &ProcessClient, text: &str, mode: DisplayMode) -> bool {
    match client.process_text(text).await {
        Ok(response) => {
            println!("{}", render(&response, mode));
            true
        }
        Err(e) => {
            log::debug!("{}", e);
            eprintln!("{}", render_error(&e));
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(if args.verbose { "debug" } else { "warn" });

    let client = ProcessClient::new(&args.url);
    info!("Using server at {}", client.base_url());

    if let Some(text) = args.input.as_deref() {
        if !process_once(&client, text, args.mode).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("Display mode: {} (change with --mode)", args.mode);
    println!("Enter JSON data, e.g. {}", INPUT_PLACEHOLDER);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        process_once(&client, &line, args.mode).await;
    }

    Ok(())
}
