// trustharvest - Trust store generator for TLS endpoints and trust lists
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::io::Write;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use trustharvest::Args;
use trustharvest::commands::CommandRouter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let command = CommandRouter::route(args);
    tracing::debug!("Running {}", command.name());

    match command.execute().await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            // Flush progress output before the error lands on stderr
            std::io::stdout().flush()?;
            eprintln!("{} {}", "Error:".red().bold(), err);

            if err.is_input_error() {
                println!();
                Args::command().print_help()?;
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
