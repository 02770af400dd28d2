use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use proftree_core::views::{render_bottoms_up_text, render_flame_text};
use proftree_core::{AnalysisConfig, analyze, parsers};
use tracing_subscriber::EnvFilter;

/// Flame tree and bottoms-up reports for V8 CPU profiles.
#[derive(Debug, Parser)]
#[command(name = "proftree", version)]
struct Cli {
    /// `.cpuprofile` file, or a saved `Profiler.stop` reply.
    #[arg(value_name = "PROFILE")]
    profile: PathBuf,

    /// Show the merged flame tree instead of the bottoms-up table.
    #[arg(short, long)]
    flame: bool,

    /// Include full caller chains in the bottoms-up table.
    #[arg(short, long)]
    verbose: bool,

    /// Print both views as JSON.
    #[arg(long)]
    json: bool,

    /// TOML file with analysis settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep the profiler's own top-level frame in the flame tree.
    #[arg(long)]
    keep_harness_frame: bool,

    /// Do not hide the harness's dispatch frames from the bottoms-up table.
    #[arg(long)]
    no_harness: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let data = std::fs::read(&cli.profile)
        .with_context(|| format!("failed to read {}", cli.profile.display()))?;
    let profile = parsers::parse_auto(&data)
        .with_context(|| format!("failed to parse {}", cli.profile.display()))?;
    tracing::info!(
        nodes = profile.nodes().len(),
        samples = profile.samples().len(),
        "loaded profile"
    );

    let analysis = analyze(&profile, &config)?;

    let mut out = std::io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &analysis)?;
        writeln!(out)?;
    } else if cli.flame {
        let flame = analysis.flame_for_display(&config);
        write!(out, "{}", render_flame_text(&flame, &config.idle_marker))?;
        for tree in &analysis.detached_trees {
            write!(out, "{}", render_flame_text(tree, &config.idle_marker))?;
        }
    } else {
        write!(out, "{}", render_bottoms_up_text(&analysis.bottoms_up))?;
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };
    if cli.verbose {
        config = config.with_callers(true);
    }
    if cli.keep_harness_frame {
        config.strip_harness_frame = false;
    }
    if cli.no_harness {
        config = config.without_harness();
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = toml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
