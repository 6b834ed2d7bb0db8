use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::gfw_source::{is_flag_code, SpatialResolution, DEFAULT_FLAGS};

#[derive(Debug, Parser)]
#[command(about = "Western Mediterranean fishing activity tracker.")]
pub struct Cli {
    /// Directory under which data/ and outputs/ are written
    #[arg(long, global = true, default_value = ".")]
    pub base_dir: PathBuf,
    /// Do not open rendered pages in a browser
    #[arg(long, global = true)]
    pub no_open: bool,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the fishing effort report, store it as CSV and render it
    Run(RunArgs),
    /// Render the outputs again from a stored CSV, without downloading
    Render(RenderArgs),
    /// List vessels with fishing activity in the area on one day
    Vessels(VesselsArgs),
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Start date (inclusive)
    #[arg(long, default_value = "2025-06-18")]
    pub start_date: NaiveDate,
    /// End date (inclusive)
    #[arg(long, default_value = "2025-06-27")]
    pub end_date: NaiveDate,
    /// Flag states to include (ISO3 codes)
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_FLAGS, value_parser = parse_flag)]
    pub flags: Vec<String>,
    /// Grid size of the report cells (low: 10th of a degree, high: 100th)
    #[arg(long, value_enum, default_value_t = SpatialResolution::Low)]
    pub spatial_resolution: SpatialResolution,
    /// Also render the geographic scatter of activity
    #[arg(long)]
    pub with_spatial: bool,
}

#[derive(Debug, Parser)]
pub struct RenderArgs {
    /// CSV to render (defaults to the raw data of the last run)
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Also render the geographic scatter of activity
    #[arg(long)]
    pub with_spatial: bool,
}

#[derive(Debug, Parser)]
pub struct VesselsArgs {
    /// Day to inspect (defaults to today, UTC)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

fn parse_flag(s: &str) -> Result<String, String> {
    let code = s.trim().to_uppercase();
    if is_flag_code(&code) {
        Ok(code)
    } else {
        Err(format!("`{}` is not an ISO3 flag code (three letters, e.g. ESP)", s))
    }
}
