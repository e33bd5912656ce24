//! Command-line parsing for the economic indicators dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline; `app` turns these structs into a `DashboardConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Metric, OutputFormat};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "econdash", version, about = "US economic indicators dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the dashboard as one HTML page or as Vega-Lite JSON files.
    Build(BuildArgs),
    /// Print the status lines and the first rows of the file.
    Preview(PreviewArgs),
    /// Print an ASCII plot of one indicator.
    Plot(PlotArgs),
    /// Launch the interactive terminal dashboard.
    ///
    /// Uses the same load pipeline as `econdash build`, rendered with Ratatui.
    Tui(TuiArgs),
}

/// Options shared by every subcommand: where the data is and how to read it.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV URL or path (default: $ECONDASH_SOURCE, then data/us_economic_indicators.csv).
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// Field delimiter (single ASCII character).
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Column holding the observation date.
    #[arg(long)]
    pub date_col: Option<String>,

    /// Column holding GDP in billions.
    #[arg(long)]
    pub gdp_col: Option<String>,

    /// Column holding year-over-year GDP growth.
    #[arg(long)]
    pub growth_col: Option<String>,

    /// Column holding the unemployment rate.
    #[arg(long)]
    pub unemployment_col: Option<String>,

    /// Column holding year-over-year inflation.
    #[arg(long)]
    pub inflation_col: Option<String>,

    /// Keep rows whose tracked indicators are missing (plotted as gaps).
    #[arg(long)]
    pub keep_missing: bool,

    /// Rows shown in the preview table.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output flavor.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Output file (html) or directory (json).
    /// Defaults to `dashboard.html` or `charts/`.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Load vega, vega-lite, and vega-embed from this directory instead of the CDN.
    #[arg(long, value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Fixed chart width in pixels (default: fill the page).
    #[arg(long)]
    pub width: Option<u32>,

    /// Chart height in pixels.
    #[arg(long, default_value_t = 320)]
    pub height: u32,

    /// Height of each panel in the stacked overview.
    #[arg(long, default_value_t = 180)]
    pub panel_height: u32,

    /// Render charts to canvas instead of SVG.
    #[arg(long)]
    pub canvas: bool,

    /// Show the Vega-Embed action menu on each chart.
    #[arg(long)]
    pub actions: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Args)]
pub struct PlotArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Indicator to plot.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::UnemploymentRate)]
    pub metric: Metric,

    /// Show the crosshair at this date (as written in the file).
    #[arg(long, value_name = "DATE")]
    pub hover: Option<String>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args)]
pub struct TuiArgs {
    #[command(flatten)]
    pub data: DataArgs,
}
