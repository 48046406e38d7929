mod classify;
mod invoke;
mod locator;
mod present;
mod settings;

use clap::{Parser, Subcommand};
use invoke::{LocalInvoker, Operation};
use locator::SourceFile;
use present::{ConsoleStyle, ConsoleSurface, Controller, Credential, MemoryCredentialStore, Trigger};
use settings::Settings;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::fmt;

/// Run, build and format Jatti files through the local cli.py
#[derive(Debug, Parser)]
#[command(name = "jatti")]
#[command(version, about = "Run, build and format Jatti files through the local cli.py")]
struct Args {
    /// Settings file (default: ./jatti.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Interpreter used to launch cli.py
    #[arg(long, global = true)]
    python: Option<String>,

    /// cli.py, or the folder that contains it
    #[arg(long, global = true)]
    tool_path: Option<String>,

    /// Workspace folder searched for cli.py (repeatable, in order)
    #[arg(long = "workspace", global = true)]
    workspace: Vec<PathBuf>,

    /// Wall-clock limit in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a .jatti file
    Run { file: PathBuf },
    /// Compile a .jatti file to a sibling .py file
    Build { file: PathBuf },
    /// Format a .jatti file
    Format { file: PathBuf },
    /// Run with the terminal attached, no capture
    Terminal {
        file: PathBuf,
        /// Only print the command line
        #[arg(long)]
        print: bool,
    },
}

impl Command {
    fn file(&self) -> &PathBuf {
        match self {
            Command::Run { file }
            | Command::Build { file }
            | Command::Format { file }
            | Command::Terminal { file, .. } => file,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(python) = args.python {
        settings.local.interpreter_path = python;
    }
    if let Some(tool_path) = args.tool_path {
        settings.local.tool_path = tool_path;
    }
    if !args.workspace.is_empty() {
        settings.local.workspace_folders = args.workspace;
    }
    if let Some(timeout) = args.timeout {
        settings.invoke.constraints.timeout_secs = timeout;
    }
    if let Ok(cwd) = std::env::current_dir() {
        settings.default_workspace(cwd);
    }

    info!(
        interpreter = %settings.local.interpreter(),
        tool_path = %settings.local.tool_path,
        "Configuration loaded"
    );

    // File-type gate: nothing is resolved or spawned for other files
    let file = match SourceFile::new(args.command.file()) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("\u{274c} {}", e);
            process::exit(2);
        }
    };

    let invoker = LocalInvoker::new(settings.local, settings.invoke.constraints);

    let operation = match args.command {
        Command::Run { .. } => Operation::Run,
        Command::Build { .. } => Operation::Build,
        Command::Format { .. } => Operation::Format,
        Command::Terminal { print, .. } => {
            let code = run_terminal(&invoker, &file, print).await;
            process::exit(code);
        }
    };

    let controller = Controller::new(
        Arc::new(invoker),
        Credential::load(Box::new(MemoryCredentialStore::default())),
        ConsoleSurface::new(ConsoleStyle::Editor),
    );

    let code = match controller.run_file(Trigger::Button, operation, file).await {
        Some(outcome) if outcome.is_success() => 0,
        _ => 1,
    };
    process::exit(code);
}

async fn run_terminal(invoker: &LocalInvoker, file: &SourceFile, print_only: bool) -> i32 {
    if print_only {
        return match invoker.command_line(file) {
            Ok(line) => {
                println!("{}", line);
                0
            }
            Err(e) => {
                eprintln!("\u{274c} {}", e);
                1
            }
        };
    }

    match invoker.run_in_terminal(file).await {
        Ok(Some(code)) => code,
        Ok(None) => 1,
        Err(e) => {
            error!(error = %e, "terminal run failed");
            eprintln!("\u{274c} {}", e);
            1
        }
    }
}
