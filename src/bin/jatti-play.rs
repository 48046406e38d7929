//! Jatti playground client
//!
//! Sends Jatti code to a playground server's POST /api/run and prints the
//! result. Uses rustyline for readline-style editing and history.
#![allow(dead_code)]

#[path = "../classify/mod.rs"]
mod classify;
#[path = "../invoke/mod.rs"]
mod invoke;
#[path = "../locator/mod.rs"]
mod locator;
#[path = "../present/mod.rs"]
mod present;
#[path = "../settings.rs"]
mod settings;

use clap::Parser;
use futures::stream::{FuturesUnordered, StreamExt};
use invoke::RemoteInvoker;
use present::samples::{self, DEFAULT_CODE, SAMPLES};
use present::{
    ConsoleStyle, ConsoleSurface, Controller, Credential, FileCredentialStore, Trigger,
};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::Level;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "jatti-play")]
#[command(about = "Jatti playground client")]
struct Args {
    /// Playground base URL (e.g., http://127.0.0.1:8000)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// API key; stored for later sessions, an empty value clears it
    #[arg(long)]
    api_key: Option<String>,

    /// Run this file once and exit
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Settings file (default: ./jatti.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// History file path
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// REPL input
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Run(Trigger),
    Clear,
    Reset,
    Key(&'a str),
    Sample(&'a str),
    Samples,
    Show,
    Quit,
    Line(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    let (command, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    match command {
        ":run" => Input::Run(Trigger::Button),
        ":r" => Input::Run(Trigger::Accelerator),
        ":clear" => Input::Clear,
        ":reset" => Input::Reset,
        ":key" => Input::Key(rest.trim()),
        ":sample" => Input::Sample(rest),
        ":samples" => Input::Samples,
        ":show" => Input::Show,
        ":quit" | ":q" => Input::Quit,
        _ => Input::Line(line),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        settings.remote.endpoint = endpoint;
    }

    let invoker = RemoteInvoker::new(settings.remote, &settings.invoke)?;
    let endpoint = invoker.endpoint().to_string();

    let store = FileCredentialStore::default_location();
    let mut credential = Credential::load(Box::new(store));
    if let Some(key) = args.api_key {
        credential.set(key)?;
    } else if let Some(key) = settings.api_key {
        credential.set_for_session(key);
    }

    let controller = Controller::new(
        Arc::new(invoker),
        credential,
        ConsoleSurface::new(ConsoleStyle::Playground),
    );

    if let Some(file) = args.file {
        let code = tokio::fs::read_to_string(&file).await?;
        let outcome = controller.run_code(Trigger::Button, code).await;
        let success = outcome.is_some_and(|o| o.is_success());
        std::process::exit(if success { 0 } else { 1 });
    }

    let history_file = args.history_file.unwrap_or_else(|| {
        dirs::home_dir()
            .map(|p| p.join(".jatti_play_history"))
            .unwrap_or_else(|| PathBuf::from(".jatti_play_history"))
    });

    run_repl(&controller, &endpoint, history_file).await
}

/// Read prompt lines on their own thread so runs stay in flight while typing.
/// The thread owns the editor and saves history when input ends.
fn spawn_reader(history_file: PathBuf) -> (mpsc::UnboundedReceiver<String>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = std::thread::spawn(move || {
        let mut rl: Editor<(), FileHistory> = match Editor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("[error] Failed to open the terminal: {}", e);
                return;
            }
        };

        if history_file.exists()
            && let Err(e) = rl.load_history(&history_file)
        {
            eprintln!("[warning] Failed to load history: {}", e);
        }

        loop {
            match rl.readline("jatti> ") {
                Ok(line) => {
                    let input = parse_input(&line);
                    if !matches!(input, Input::Line(_)) {
                        let _ = rl.add_history_entry(line.trim());
                    }
                    let quit = input == Input::Quit;
                    if tx.send(line).is_err() || quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("[error] Readline error: {}", e);
                    break;
                }
            }
        }

        if let Err(e) = rl.save_history(&history_file) {
            eprintln!("[warning] Failed to save history: {}", e);
        }
    });

    (rx, handle)
}

async fn run_repl(
    controller: &Controller<ConsoleSurface>,
    endpoint: &str,
    history_file: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("jatti-play v{}", env!("CARGO_PKG_VERSION"));
    println!("Endpoint: {}", endpoint);
    println!("Lines are added to the program. :run to execute (:r runs even while busy),");
    println!(":show to print it, :reset to start empty, :sample <name>, :samples,");
    println!(":key <value>, :clear, :quit.");
    println!();

    let (mut lines, reader) = spawn_reader(history_file);
    let mut buffer = DEFAULT_CODE.to_string();
    let mut runs = FuturesUnordered::new();

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    break;
                };

                match parse_input(&line) {
                    Input::Run(trigger) => {
                        if buffer.trim().is_empty() {
                            println!("[empty program]");
                        }
                        runs.push(controller.run_code(trigger, buffer.clone()));
                    }
                    Input::Clear => controller.clear(),
                    Input::Reset => buffer.clear(),
                    Input::Key(value) => match controller.set_credential(value) {
                        Ok(()) if value.is_empty() => println!("[key cleared]"),
                        Ok(()) => println!("[key saved]"),
                        Err(e) => eprintln!("[error] Failed to store key: {}", e),
                    },
                    Input::Sample(name) => match samples::find(name) {
                        Some(code) => {
                            buffer = code.to_string();
                            print!("{}", buffer);
                        }
                        None => println!("[unknown sample] {}", name.trim()),
                    },
                    Input::Samples => {
                        for sample in SAMPLES {
                            println!("  {}", sample.name);
                        }
                    }
                    Input::Show => print!("{}", buffer),
                    Input::Quit => break,
                    Input::Line(text) => {
                        buffer.push_str(text);
                        buffer.push('\n');
                    }
                }
            }
            Some(outcome) = runs.next(), if !runs.is_empty() => {
                if outcome.is_none() {
                    println!("[busy] A run is in flight; :r runs alongside it.");
                }
            }
        }
    }

    // In-flight runs still print their results
    while runs.next().await.is_some() {}
    drop(lines);
    let _ = tokio::task::spawn_blocking(move || reader.join()).await;

    println!("\nGoodbye!");
    Ok(())
}
