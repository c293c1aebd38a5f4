//! ptsk-pack - PTSKCAT4 catalog packer
//!
//! Converts a directory of constellation descriptors into one binary star catalog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use ptsk_pack::{
    BuildConfig, CatalogReader, CatalogStats, PTSK_CATALOG_FORMAT, build_from_dir,
    has_catalog_extension, write_catalog,
};

#[derive(Parser)]
#[command(name = "ptsk-pack")]
#[command(about = "PTSKCAT4 constellation catalog packer")]
#[command(version)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a catalog from a descriptor directory
    Build {
        /// Directory containing one descriptor per constellation
        src_dir: PathBuf,

        /// Output catalog file
        out_path: PathBuf,

        /// Build configuration (default: <src_dir>/catalog.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the whole build in memory without writing a catalog
    Check {
        /// Directory containing one descriptor per constellation
        src_dir: PathBuf,

        /// Build configuration (default: <src_dir>/catalog.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the header and section directory of a catalog
    Inspect {
        /// Catalog file
        catalog: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match cli.command {
        Commands::Build {
            src_dir,
            out_path,
            config,
        } => {
            tracing::info!("Building {} -> {}", src_dir.display(), out_path.display());
            if !has_catalog_extension(&out_path) {
                tracing::warn!(
                    "Output {} does not use the .{} extension",
                    out_path.display(),
                    PTSK_CATALOG_FORMAT.extension
                );
            }
            let config = BuildConfig::resolve(config.as_deref(), &src_dir)?;
            let built = build_from_dir(&src_dir, &config)
                .with_context(|| format!("Failed to build catalog from {}", src_dir.display()))?;
            write_catalog(&out_path, &built.bytes)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;
            log_stats(&built.stats);
            tracing::info!("OK: {}", out_path.display());
        }
        Commands::Check { src_dir, config } => {
            let config = BuildConfig::resolve(config.as_deref(), &src_dir)?;
            let built = build_from_dir(&src_dir, &config)
                .with_context(|| format!("Check failed for {}", src_dir.display()))?;
            log_stats(&built.stats);
            tracing::info!("Check passed: {}", src_dir.display());
        }
        Commands::Inspect { catalog } => {
            inspect(&catalog)?;
        }
    }

    Ok(())
}

fn log_stats(stats: &CatalogStats) {
    tracing::info!(
        "{} descriptors: {} stars, {} asterisms ({} polylines, {} nodes), {} art overlays, {} strings, {} bytes",
        stats.descriptors,
        stats.stars,
        stats.asterisms,
        stats.polylines,
        stats.nodes,
        stats.overlays,
        stats.strings,
        stats.total_bytes
    );
}

fn inspect(path: &Path) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let catalog = CatalogReader::parse(&bytes)
        .with_context(|| format!("Invalid catalog {}", path.display()))?;

    println!("{}", path.display());
    println!(
        "  {} v{}, {} sections, {} bytes",
        String::from_utf8_lossy(&catalog.header.magic),
        catalog.header.version,
        catalog.header.section_count,
        bytes.len()
    );
    println!();
    println!("  {:<6} {:>10} {:>10} {:>8}", "TAG", "OFFSET", "LENGTH", "COUNT");
    for entry in &catalog.directory {
        println!(
            "  {:<6} {:>10} {:>10} {:>8}",
            entry.tag_str(),
            entry.offset,
            entry.length,
            entry.count
        );
    }

    let populated: Vec<u16> = (0..catalog.constellations.len() as u16)
        .filter(|&c| catalog.stars_in(c).next().is_some())
        .collect();
    if !populated.is_empty() {
        println!();
        for c in populated {
            let (abbr, name) = catalog.constellation(c)?;
            println!(
                "  {} {:<20} {:>4} stars {:>3} asterisms {:>3} overlays",
                abbr,
                name,
                catalog.stars_in(c).count(),
                catalog.asterisms_in(c).count(),
                catalog.overlays_in(c).count()
            );
        }
    }
    Ok(())
}
