use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stokvel_extract::{assess_quality, extract_transactions, TextStatement};
use stokvel_tier::analyze_affordability;

#[derive(Parser)]
#[command(name = "stokvel", version, about = "Bank statement extraction and affordability tiering")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract transactions from a statement text file and print them as JSON
    Extract {
        /// Statement text file, or "-" for stdin. Form feeds separate pages.
        input: PathBuf,
        /// Include the extraction quality report in the output
        #[arg(long)]
        quality: bool,
    },
    /// Extract transactions and run the full affordability analysis
    Analyze {
        /// Statement text file, or "-" for stdin. Form feeds separate pages.
        input: PathBuf,
        /// User the analysis is attributed to
        #[arg(long)]
        user_id: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract { input, quality } => extract(&input, quality),
        Command::Analyze { input, user_id } => analyze(&input, &user_id),
    }
}

fn extract(input: &PathBuf, quality: bool) -> Result<()> {
    let transactions = extract_transactions(&load_statement(input)?);
    let output = if quality {
        json!({
            "transactions": transactions,
            "quality": assess_quality(&transactions),
        })
    } else {
        json!(transactions)
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn analyze(input: &PathBuf, user_id: &str) -> Result<()> {
    let transactions = extract_transactions(&load_statement(input)?);
    let result = analyze_affordability(user_id, &transactions)
        .with_context(|| format!("affordability analysis failed for {user_id}"))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn load_statement(input: &PathBuf) -> Result<TextStatement> {
    let text = if input.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading statement from stdin")?;
        buffer
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("reading statement from {}", input.display()))?
    };

    let pages: Vec<String> = text.split('\u{c}').map(str::to_string).collect();
    debug!(pages = pages.len(), bytes = text.len(), "loaded statement");
    Ok(TextStatement::from_pages(pages))
}
