#![warn(rust_2018_idioms)]

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use tracing_appender::non_blocking::WorkerGuard;

use vault_appid::{Config, Credentials, VaultClient, VaultError};

const USAGE: &str = "usage: vault-appid <config.json> <credentials.json> <list|read|delete> <path>\n       vault-appid <config.json> <credentials.json> write <path> <json-object>";

enum Command {
    List(String),
    Read(String),
    Write(String, HashMap<String, serde_json::Value>),
    Delete(String),
}

struct Args {
    config: String,
    credentials: String,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let (config, credentials, op, path) = match args {
        [config, credentials, op, path, ..] => (config, credentials, op, path.clone()),
        _ => return Err(USAGE.to_string()),
    };

    let command = match (op.as_str(), args.get(4)) {
        ("list", None) => Command::List(path),
        ("read", None) => Command::Read(path),
        ("delete", None) => Command::Delete(path),
        ("write", Some(json)) => {
            let data = serde_json::from_str(json)
                .map_err(|e| format!("secret data must be a JSON object: {}", e))?;
            Command::Write(path, data)
        }
        _ => return Err(USAGE.to_string()),
    };

    Ok(Args {
        config: config.clone(),
        credentials: credentials.clone(),
        command,
    })
}

async fn run(args: Args) -> Result<Option<serde_json::Value>, VaultError> {
    let config = Config::from_file(&args.config)?;
    let credentials = Credentials::from_file(&args.credentials)?;
    let client = VaultClient::new(config, credentials).await?;

    let output = match args.command {
        Command::List(path) => Some(serde_json::to_value(client.list(&path).await?)?),
        Command::Read(path) => Some(serde_json::to_value(client.read(&path).await?)?),
        Command::Write(path, data) => {
            client.write(&path, &data).await?;
            None
        }
        Command::Delete(path) => {
            client.delete(&path).await?;
            None
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    let _guard = init_logger();

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(usage) => {
            eprintln!("{}", usage);
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(Some(value)) => {
            println!("{:#}", value);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Vault operation failed");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logger() -> Option<WorkerGuard> {
    use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
    use tracing_log::LogTracer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::{EnvFilter, Registry};

    if !env::var("JSON_LOG").map_or(false, |s| s.parse().unwrap_or_default()) {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    // Redirect the logs from log library to tracing's subscribers.
    LogTracer::init().expect("Unable to setup log tracer!");

    let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();

    // Non-blocking stderr writer, stdout carries the command output
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking_writer);
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer);
    tracing::subscriber::set_global_default(subscriber).expect("Unable to set global subscriber");
    Some(guard)
}
