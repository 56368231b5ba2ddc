//! cap: command-line client for the CAP tracker daemon.

mod cli;
mod client;

use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::Engine;
use clap::Parser;
use serde_json::{json, Value};

use crate::cli::{Cli, Command};
use crate::client::RpcClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let socket = cli.socket.clone().unwrap_or_else(default_socket_path);
    let mut client = RpcClient::connect(&socket.display().to_string()).await?;

    if cli.command.is_admin() {
        let secret = cli
            .secret
            .as_deref()
            .context("this command needs --secret or CAP_ADMIN_SECRET")?;
        client
            .call("authenticate", json!({ "secret": secret }))
            .await?;
    }

    let output = run(&mut client, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(client: &mut RpcClient, command: Command) -> anyhow::Result<Value> {
    let value = match command {
        Command::Roster => client.call("get_roster", Value::Null).await?,
        Command::List => client.call("list_cities", Value::Null).await?,
        Command::Show { city } => client.call("get_city", json!({ "city": city })).await?,
        Command::Summary => client.call("get_state_summary", Value::Null).await?,
        Command::Factors => client.call("get_emission_factors", Value::Null).await?,
        Command::Inventory { city } => {
            client.call("get_inventory", json!({ "city": city })).await?
        }
        Command::Breakdown { city } => {
            client
                .call("get_sector_breakdown", json!({ "city": city }))
                .await?
        }
        Command::UpsertCity(args) => client.call("upsert_city", args.to_params()).await?,
        Command::SetStatus { city, status } => {
            client
                .call("set_cap_status", json!({ "city": city, "status": status }))
                .await?
        }
        Command::SaveInventory(args) => {
            client
                .call(
                    "save_inventory",
                    json!({ "city": args.city, "activity": args.activity() }),
                )
                .await?
        }
        Command::Report(args) => {
            let reply = client
                .call(
                    "generate_report",
                    json!({
                        "city": args.city,
                        "requester": {
                            "name": args.name,
                            "email": args.email,
                            "contact": args.contact,
                        },
                    }),
                )
                .await?;
            let path = save_report(&reply, &args.out)?;
            json!({ "filename": reply["filename"], "path": path.display().to_string() })
        }
    };
    Ok(value)
}

/// Decode a `generate_report` reply and write the PDF into `out_dir`.
fn save_report(reply: &Value, out_dir: &Path) -> anyhow::Result<PathBuf> {
    let filename = reply["filename"]
        .as_str()
        .context("reply is missing filename")?;
    let encoded = reply["pdf_base64"]
        .as_str()
        .context("reply is missing pdf_base64")?;
    let pdf = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .context("reply carries invalid base64")?;

    // The daemon builds the name; never let it climb out of out_dir.
    let name = Path::new(filename)
        .file_name()
        .context("reply filename is empty")?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(name);
    std::fs::write(&path, &pdf).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn default_socket_path() -> PathBuf {
    let data_dir = std::env::var("CAP_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| {
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".cap-tracker"))
            .unwrap_or_else(|_| PathBuf::from("/tmp/cap-tracker"))
    });
    data_dir.join("daemon.sock")
}
