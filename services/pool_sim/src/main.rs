//! Pool simulator entry point

mod scenario;

use amm::{quote_output, BPS_DENOMINATOR};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::SettingsLoader;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a single swap against the given reserves
    Quote {
        #[arg(long)]
        amount_in: u128,

        #[arg(long)]
        reserve_in: u128,

        #[arg(long)]
        reserve_out: u128,

        /// Swap fee in basis points
        #[arg(long, default_value_t = 30)]
        fee_bps: u32,
    },

    /// Run deposit, swaps across a TWAP interval and withdrawal on a mock ledger
    Scenario {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Environment overlay name, e.g. `staging`
        #[arg(short, long)]
        env: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Quote {
            amount_in,
            reserve_in,
            reserve_out,
            fee_bps,
        } => {
            let amount_out = quote_output(amount_in, reserve_in, reserve_out, fee_bps)
                .context("Failed to quote swap")?;
            let new_reserve_in = reserve_in
                .checked_add(amount_in)
                .context("Input reserve overflows u128")?;
            println!("amount_out:   {amount_out}");
            println!(
                "reserves:     ({new_reserve_in}, {})",
                reserve_out - amount_out
            );
            println!(
                "fee:          {fee_bps} bps ({:.2}%)",
                f64::from(fee_bps) * 100.0 / f64::from(BPS_DENOMINATOR)
            );
        }
        Command::Scenario { config, env, json } => {
            let mut loader = SettingsLoader::new();
            if let Some(path) = &config {
                loader = loader.file(path);
            }
            if let Some(name) = &env {
                loader = loader.environment(name);
            }
            let settings = loader.load().context("Failed to load pool settings")?;
            info!(?settings, "Settings loaded");

            let report = scenario::run(&settings)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to encode report")?
                );
            } else {
                report.print();
            }
        }
    }

    Ok(())
}
