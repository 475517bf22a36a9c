use std::path::{Path, PathBuf};

use canvas::image;
use clap::{Args, Parser, Subcommand};
use remote::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use remote::{RemoteClient, RemoteConfig, RemoteError};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod script;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Canvas(#[from] canvas::CanvasError),
    #[error("script step {index} ({op}) failed: {source}")]
    Step {
        index: usize,
        op: &'static str,
        source: canvas::CanvasError,
    },
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("{path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sketch-cli", about = "Sketchpad drawing, remote storage and chat CLI")]
struct Cli {
    #[arg(long, env = "SKETCH_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "SKETCH_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    #[arg(long, env = "SKETCH_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON drawing script and export the result.
    Render(RenderArgs),
    /// Upload a file to `/upload`.
    Upload { file: PathBuf },
    /// Key/value storage.
    Kv(KvCommand),
    /// Join a chat room: stdin lines are sent, incoming messages printed.
    Chat { room: String },
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long)]
    script: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    #[arg(long, default_value = "white")]
    background: String,

    #[arg(long, help = "Write a PNG here instead of printing the data URL")]
    out: Option<PathBuf>,

    #[arg(long, help = "POST {image} to this endpoint (absolute, or a path under --base-url)")]
    save_to: Option<String>,
}

#[derive(Args, Debug)]
struct KvCommand {
    #[command(subcommand)]
    command: KvSubcommand,
}

#[derive(Subcommand, Debug)]
enum KvSubcommand {
    Save {
        key: String,
        #[arg(help = "JSON value")]
        value: String,
    },
    Get {
        key: String,
    },
    Delete {
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Render(args) => run_render(&cli, args).await,
        Command::Upload { file } => {
            let json = remote_client(&cli)?.upload_path(file).await?;
            print_json(&json)
        }
        Command::Kv(kv) => run_kv(&cli, kv).await,
        Command::Chat { room } => run_chat(&cli, room).await,
    }
}

fn remote_client(cli: &Cli) -> Result<RemoteClient, CliError> {
    let base_url = cli.base_url.as_deref().ok_or(RemoteError::MissingBaseUrl)?;
    let mut config = RemoteConfig::new(base_url)?;
    config.request_timeout_secs = cli.request_timeout_secs;
    config.connect_timeout_secs = cli.connect_timeout_secs;
    Ok(RemoteClient::new(config)?)
}

async fn run_render(cli: &Cli, args: &RenderArgs) -> Result<(), CliError> {
    let text = read_to_string(&args.script)?;
    let steps = script::parse(&text)?;
    let base_dir = args.script.parent().unwrap_or_else(|| Path::new("."));

    let pixels = script::render(&steps, args.width, args.height, &args.background, base_dir)?;
    let data_url = image::to_data_url(&pixels)?;
    match &args.out {
        Some(path) => {
            let png = image::encode_png(&pixels)?;
            std::fs::write(path, png).map_err(|source| io_err(path, source))?;
            info!(path = %path.display(), "png written");
        }
        None => println!("{data_url}"),
    }

    if let Some(endpoint) = &args.save_to {
        let json = remote_client(cli)?.save_image(endpoint, &data_url).await?;
        print_json(&json)?;
    }
    Ok(())
}

async fn run_kv(cli: &Cli, kv: &KvCommand) -> Result<(), CliError> {
    let client = remote_client(cli)?;
    let json = match &kv.command {
        KvSubcommand::Save { key, value } => {
            let value = serde_json::from_str::<Value>(value)?;
            client.save(key, &value).await?
        }
        KvSubcommand::Get { key } => client.get(key).await?,
        KvSubcommand::Delete { key } => client.delete(key).await?,
    };
    print_json(&json)
}

async fn run_chat(cli: &Cli, room: &str) -> Result<(), CliError> {
    let mut client = remote_client(cli)?;
    let mut inbox = client.connect_chat(room).await;
    let printer = tokio::spawn(async move {
        while let Some(msg) = inbox.recv().await {
            println!("{}", msg.message);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(|source| io_err(Path::new("<stdin>"), source))? {
        let line = line.trim();
        if !line.is_empty() {
            client.send_chat(line).await;
        }
    }

    client.close_chat().await;
    if let Err(e) = printer.await {
        warn!(error = %e, "chat printer ended abnormally");
    }
    Ok(())
}

fn read_to_string(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| io_err(path, source))
}

fn io_err(path: &Path, source: std::io::Error) -> CliError {
    CliError::Io { path: path.display().to_string(), source }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
