//! Resets a running service to a known set of recommendations.
//!
//! Deletes every recommendation through the REST API, then creates each
//! record from a JSON array file:
//!
//! ```sh
//! cargo run --bin seed -- --base-url http://localhost:8080 recommendations.json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use reqwest::StatusCode;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Clear and reload recommendations over the REST API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding an array of recommendations
    file: PathBuf,

    /// Root URL of the running service
    #[arg(long, env = "BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "seed=info".into()))
        .init();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let path = args.file.display();

    let contents = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {path}"))?;
    let records: Vec<Value> =
        serde_json::from_str(&contents).with_context(|| format!("{path} must hold a JSON array"))?;

    let endpoint = format!("{}/recommendations", args.base_url.trim_end_matches('/'));
    let client = reqwest::Client::new();

    let deleted = clear(&client, &endpoint).await?;
    tracing::info!(deleted, "Removed existing recommendations");

    for record in &records {
        let response = client.post(&endpoint).json(record).send().await?;
        if response.status() != StatusCode::CREATED {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Creating {record} returned {status}: {body}");
        }

        let created: Value = response.json().await?;
        tracing::info!(rec_id = %created["rec_id"], "Created recommendation");
    }

    tracing::info!(created = records.len(), "Seeding complete");
    Ok(())
}

async fn clear(client: &reqwest::Client, endpoint: &str) -> anyhow::Result<usize> {
    let response = client.get(endpoint).send().await?;
    if response.status() != StatusCode::OK {
        bail!("Listing recommendations returned {}", response.status());
    }

    let existing: Vec<Value> = response.json().await?;
    for rec in &existing {
        let rec_id = rec["rec_id"]
            .as_i64()
            .with_context(|| format!("Listed recommendation without rec_id: {rec}"))?;

        let status = client
            .delete(format!("{endpoint}/{rec_id}"))
            .send()
            .await?
            .status();
        if status != StatusCode::NO_CONTENT {
            bail!("Deleting recommendation {rec_id} returned {status}");
        }
    }

    Ok(existing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_file_and_base_url() {
        let args = Args::try_parse_from(["seed", "--base-url", "http://svc:9000", "recs.json"]).unwrap();
        assert_eq!(args.file, PathBuf::from("recs.json"));
        assert_eq!(args.base_url, "http://svc:9000");
    }

    #[test]
    fn test_file_is_required() {
        let err = Args::try_parse_from(["seed"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_help_is_not_taken_as_a_path() {
        let err = Args::try_parse_from(["seed", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Args::try_parse_from(["seed", "--verbose", "recs.json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
