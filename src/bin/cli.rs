//! kvdb CLI Client
//!
//! Command-line interface for the key value db server. With a subcommand it
//! runs one request; without one it reads command lines interactively.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kvdb::config::DEFAULT_RECONNECT_ATTEMPTS;
use kvdb::{Client, ClientConfig, Command};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{fmt, EnvFilter};

/// kvdb CLI
#[derive(Parser, Debug)]
#[command(name = "kvdb-cli")]
#[command(about = "CLI for the key value db server")]
#[command(version)]
struct Args {
    /// Server host name
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = 6708)]
    port: u16,

    /// Server address (host:port), overrides --host and --port
    #[arg(short, long, env = "ADDR")]
    addr: Option<String>,

    /// Dial attempts when a request finds no connection
    #[arg(short, long, default_value_t = DEFAULT_RECONNECT_ATTEMPTS)]
    retries: u32,

    /// Socket read/write timeout in milliseconds (0 waits forever)
    #[arg(short, long, default_value_t = 0)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },
}

const HELP_TEXT: &str = "\
Commands:
  get <key>            Get a value by key
  set <key> <value>    Set a key-value pair
  exit                 Close the session and quit
";

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only server responses
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kvdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let addr = args
        .addr
        .clone()
        .unwrap_or_else(|| format!("{}:{}", args.host, args.port));

    let config = ClientConfig::builder()
        .addr(addr)
        .reconnect_attempts(args.retries)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    tracing::info!("Connecting to key value db at {}", config.addr);

    let mut client = match Client::open(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Some(command) => run_once(&mut client, command),
        None => run_interactive(&mut client),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute a single subcommand, then end the session
fn run_once(client: &mut Client, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let payload = match command {
        Commands::Get { key } => client.get(&key)?,
        Commands::Set { key, value } => client.set(&key, &value)?,
    };
    print_payload(&payload)?;

    if let Err(e) = client.close() {
        tracing::warn!("{}", e);
    }
    Ok(())
}

/// Read, send, print until `exit` or end of input
fn run_interactive(client: &mut Client) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("kvdb> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Err(e) = editor.add_history_entry(line) {
            tracing::debug!("Failed to record history entry: {}", e);
        }

        if line == "help" {
            print!("{}", HELP_TEXT);
            continue;
        }

        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match client.execute(command) {
            Ok(Some(payload)) => print_payload(&payload)?,
            Ok(None) => return Ok(()),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    // End of input without `exit`: still tell the server we are leaving
    if client.is_connected() {
        client.close()?;
    }
    Ok(())
}

fn print_payload(payload: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(payload)?;
    if !payload.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}
