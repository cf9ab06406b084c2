mod logging;

use std::time::Duration;

use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use error_stack::Report;
use ldp_client::ContainerState;
use ldp_client::PodClient;
use ldp_client::PodConfig;
use ldp_client::PodError;
use ldp_client::Record;

/// Manage newline-delimited record resources in an LDP pod.
#[derive(Parser)]
#[command(about, long_about = None)]
struct Cli {
    /// Base URL of the pod
    #[arg(long, env = "POD_URL")]
    pod_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ensure a container exists under the pod
    CreateContainer {
        /// Container name, may contain `/` for nesting
        name: String,
    },
    /// Replace a resource's contents with the given values
    Publish {
        container: String,
        resource: String,
        /// Values to store, parsed as JSON scalars when possible
        values: Vec<String>,
    },
    /// Print a resource's records, one per line
    Read {
        container: String,
        resource: String,
    },
    /// Append values to a resource, keeping its current contents
    Update {
        container: String,
        resource: String,
        /// Values to append, parsed as JSON scalars when possible
        values: Vec<String>,
    },
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    let config =
        PodConfig::new(&cli.pod_url).with_request_timeout(Duration::from_secs(cli.timeout));
    let client = PodClient::new(config)
        .map_err(flatten_report)
        .context("Failed to create pod client")?;

    match cli.command {
        Command::CreateContainer { name } => {
            let state = client
                .create_container(&name)
                .map_err(flatten_report)
                .with_context(|| format!("Failed to create container {name}"))?;
            match state {
                ContainerState::AlreadyExists => println!("container {name} already exists"),
                ContainerState::Created => println!("container {name} created"),
            }
        }
        Command::Publish {
            container,
            resource,
            values,
        } => {
            let records = parse_values(&values);
            client
                .publish_records(&container, &resource, &records)
                .map_err(flatten_report)
                .with_context(|| format!("Failed to publish to {container}/{resource}"))?;
            println!("published {} record(s) to {container}/{resource}", records.len());
        }
        Command::Read {
            container,
            resource,
        } => {
            let records = client
                .read_records(&container, &resource)
                .map_err(flatten_report)
                .with_context(|| format!("Failed to read {container}/{resource}"))?;
            for record in records {
                println!("{record}");
            }
        }
        Command::Update {
            container,
            resource,
            values,
        } => {
            let records = parse_values(&values);
            client
                .update_records(&container, &resource, &records)
                .map_err(flatten_report)
                .with_context(|| format!("Failed to update {container}/{resource}"))?;
            println!("appended {} record(s) to {container}/{resource}", records.len());
        }
    }

    Ok(())
}

/// error-stack reports do not implement `std::error::Error`, flatten them
/// into an anyhow error carrying the full report rendering.
fn flatten_report(report: Report<PodError>) -> anyhow::Error {
    anyhow!("{report:?}")
}

fn parse_values(values: &[String]) -> Vec<Record> {
    values.iter().map(|value| parse_value(value)).collect()
}

/// Parse a command-line value as a JSON scalar, falling back to plain text.
fn parse_value(raw: &str) -> Record {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Bool(value)) => Record::from(value),
        Ok(serde_json::Value::Number(number)) => number
            .as_i64()
            .map(Record::from)
            .or_else(|| number.as_f64().map(Record::from))
            .unwrap_or_else(|| Record::from(raw)),
        Ok(serde_json::Value::String(value)) => Record::from(value),
        _ => Record::from(raw),
    }
}
