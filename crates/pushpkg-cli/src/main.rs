//! Command-line interface for building Safari web push packages.
//!
//! Builds a signed package from a JSON configuration file, verifies an
//! existing package, or reaps old staging directories.

use clap::{Parser, Subcommand};
use log::info;
use pushpkg::verify::load_trusted_certificates;
use pushpkg::{reap_staging, verify_package, ConfigFile, PushPackage};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pushpkg")]
#[command(about = "Safari web push package builder")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build and sign a push package for one user
    Build {
        /// JSON configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// User authentication token
        #[arg(short, long)]
        token: String,

        /// Copy the finished archive here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify an existing push package
    Verify {
        /// Package archive (.zip)
        archive: PathBuf,

        /// Trusted root certificate (PEM); may be repeated
        #[arg(long = "ca")]
        ca: Vec<PathBuf>,
    },

    /// Remove staging directories and archives older than the given age
    Reap {
        /// Temporary root the packages were built in
        #[arg(long)]
        temp_dir: PathBuf,

        /// Maximum age in seconds
        #[arg(long, default_value = "3600")]
        max_age: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Command::Build {
            config,
            token,
            output,
        } => {
            let config = ConfigFile::load(&config)?.into_config()?;
            let archive = PushPackage::new(config).create_push_package(&token)?;

            let archive = match output {
                Some(output) => {
                    fs::copy(&archive, &output)?;
                    output
                }
                None => archive,
            };
            println!("{}", archive.display());
        }
        Command::Verify { archive, ca } => {
            let trust = load_trusted_certificates(&ca)?;

            let verified = verify_package(&archive, &trust)?;
            println!(
                "OK: {} ({} files, {}-byte signature{})",
                verified.website.website_push_id,
                verified.manifest.len(),
                verified.signature_len,
                if trust.is_empty() { ", chain not checked" } else { "" }
            );
        }
        Command::Reap { temp_dir, max_age } => {
            let report = reap_staging(&temp_dir, Duration::from_secs(max_age))?;
            info!(
                "removed {} directories, {} archives ({} failures)",
                report.removed_dirs, report.removed_archives, report.failed
            );
        }
    }

    Ok(())
}
