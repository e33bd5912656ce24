//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - runs the load pipeline
//! - writes the dashboard page or spec files
//! - prints previews and terminal plots

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::chart::HoverState;
use crate::cli::{BuildArgs, Command, DataArgs, PlotArgs, PreviewArgs};
use crate::domain::{AssetSource, ChartLayout, ColumnOverrides, DashboardConfig, MissingPolicy, OutputFormat};
use crate::error::AppError;
use crate::io::CsvLoader;
use crate::plot::{MetricSeries, render_metric_plot};
use crate::render::{ChartRenderer, EmbedBackend, EmbedOptions, HtmlRenderer, JsonDirRenderer};
use crate::report::{StatusBoard, format_table};

pub mod pipeline;

/// Environment variable naming the default data source.
pub const SOURCE_ENV: &str = "ECONDASH_SOURCE";
pub const DEFAULT_SOURCE: &str = "data/us_economic_indicators.csv";

/// Entry point for the `econdash` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `econdash` and `econdash --source x.csv` behave like `econdash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // Log lines would draw over the alternate screen, so the TUI is silent
    // unless RUST_LOG asks otherwise.
    init_tracing(match cli.command {
        Command::Tui(_) => "off",
        _ => "econ_dash=info",
    });

    match cli.command {
        Command::Build(args) => handle_build(args),
        Command::Preview(args) => handle_preview(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(dashboard_config_from_args(&args.data)?),
    }
}

/// Log to stderr, filtered by `RUST_LOG` or `default_filter`.
fn init_tracing(default_filter: &str) {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_build(args: BuildArgs) -> Result<(), AppError> {
    let mut config = dashboard_config_from_args(&args.data)?;
    config.layout = ChartLayout {
        width: args.width,
        height: args.height,
        panel_height: args.panel_height,
    };

    let options = EmbedOptions {
        actions: args.actions,
        renderer: if args.canvas { EmbedBackend::Canvas } else { EmbedBackend::Svg },
    };

    let mut renderer: Box<dyn ChartRenderer> = match args.format {
        OutputFormat::Html => {
            let assets = args.assets_dir.map_or(AssetSource::Cdn, AssetSource::Local);
            let out = args.out.unwrap_or_else(|| PathBuf::from("dashboard.html"));
            Box::new(HtmlRenderer::new(out, assets))
        }
        OutputFormat::Json => {
            let out = args.out.unwrap_or_else(|| PathBuf::from("charts"));
            Box::new(JsonDirRenderer::new(out))
        }
    };

    let loader = CsvLoader::new()?;
    let mut status = StatusBoard::new();
    let result = pipeline::build_output(&config, &loader, renderer.as_mut(), &options, &mut status);
    print!("{}", status.render());

    let (run, path) = result?;
    println!("Wrote {} charts to {}", run.dashboard.len(), path.display());
    Ok(())
}

fn handle_preview(args: PreviewArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args.data)?;
    let loader = CsvLoader::new()?;
    let mut status = StatusBoard::new();

    let result = pipeline::run_dashboard(&config, &loader, &mut status);
    print!("{}", status.render());
    let run = result?;

    println!();
    println!("Columns: {}", describe_columns(&run));
    println!();
    print!("{}", format_table(&run.table, config.preview_limit, 24));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let config = dashboard_config_from_args(&args.data)?;
    let loader = CsvLoader::new()?;
    let mut status = StatusBoard::new();

    let result = pipeline::run_dashboard(&config, &loader, &mut status);
    print!("{}", status.render());
    let run = result?;

    if !run.columns.is_tracked(args.metric) {
        return Err(AppError::config(format!(
            "No column for {} in {} (headers: {}).",
            args.metric.title(),
            run.source.path(),
            run.table.headers.join(", ")
        )));
    }

    let series = MetricSeries::from_rows(&run.rows, args.metric);
    let hover = match &args.hover {
        None => HoverState::Idle,
        Some(date) => {
            let index = series.position_of(date.trim()).ok_or_else(|| {
                AppError::config(format!("No {} value dated {date}.", args.metric.title()))
            })?;
            HoverState::Hover { index }
        }
    };

    println!();
    print!("{}", render_metric_plot(&series, hover, args.width, args.height));
    Ok(())
}

fn describe_columns(run: &pipeline::DashboardRun) -> String {
    let mut parts = vec![format!("date={}", run.columns.date)];
    for metric in crate::domain::Metric::ALL {
        let col = run.columns.column(metric).unwrap_or("(untracked)");
        parts.push(format!("{}={col}", metric.field()));
    }
    parts.join(", ")
}

/// Build the run configuration; the source falls back to `$ECONDASH_SOURCE`.
pub fn dashboard_config_from_args(args: &DataArgs) -> Result<DashboardConfig, AppError> {
    let source = args
        .source
        .clone()
        .or_else(|| std::env::var(SOURCE_ENV).ok().filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    config_with_source(args, source)
}

fn config_with_source(args: &DataArgs, source: String) -> Result<DashboardConfig, AppError> {
    if !args.delimiter.is_ascii() || args.delimiter == '\n' || args.delimiter == '\r' {
        return Err(AppError::config(format!(
            "--delimiter must be a single ASCII character other than a line break, got {:?}.",
            args.delimiter
        )));
    }

    let mut config = DashboardConfig::new(source);
    config.delimiter = args.delimiter as u8;
    config.columns = ColumnOverrides {
        date: args.date_col.clone(),
        gdp_billions: args.gdp_col.clone(),
        gdp_growth_yoy: args.growth_col.clone(),
        unemployment_rate: args.unemployment_col.clone(),
        inflation_yoy: args.inflation_col.clone(),
    };
    config.missing_policy = if args.keep_missing {
        MissingPolicy::Keep
    } else {
        MissingPolicy::Drop
    };
    config.preview_limit = args.limit;
    Ok(config)
}

/// Rewrite argv so `econdash` defaults to `econdash tui`.
///
/// Rules:
/// - `econdash`                     -> `econdash tui`
/// - `econdash --source x.csv ...`  -> `econdash tui --source x.csv ...`
/// - `econdash --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "build" | "preview" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::error::ErrorKind;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn data_args(args: &[&str]) -> DataArgs {
        let mut full = vec!["econdash", "preview"];
        full.extend_from_slice(args);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Preview(p) => p.data,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_and_leading_flags_default_to_tui() {
        assert_eq!(rewrite_args(argv(&["econdash"])), argv(&["econdash", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["econdash", "--source", "x.csv"])),
            argv(&["econdash", "tui", "--source", "x.csv"])
        );
        assert_eq!(
            rewrite_args(argv(&["econdash", "build", "--format", "json"])),
            argv(&["econdash", "build", "--format", "json"])
        );
        assert_eq!(rewrite_args(argv(&["econdash", "--help"])), argv(&["econdash", "--help"]));
    }

    #[test]
    fn data_flags_map_onto_config() {
        let args = data_args(&[
            "--delimiter",
            ";",
            "--date-col",
            "Quarter",
            "--unemployment-col",
            "UNRATE",
            "--keep-missing",
            "--limit",
            "5",
        ]);
        let config = config_with_source(&args, "x.csv".to_string()).unwrap();
        assert_eq!(config.source, "x.csv");
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.columns.date.as_deref(), Some("Quarter"));
        assert_eq!(config.columns.unemployment_rate.as_deref(), Some("UNRATE"));
        assert_eq!(config.columns.gdp_billions, None);
        assert_eq!(config.missing_policy, MissingPolicy::Keep);
        assert_eq!(config.preview_limit, 5);
    }

    #[test]
    fn defaults_are_strict_with_twenty_rows() {
        let config = config_with_source(&data_args(&[]), DEFAULT_SOURCE.to_string()).unwrap();
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.missing_policy, MissingPolicy::Drop);
        assert_eq!(config.preview_limit, 20);
    }

    #[test]
    fn non_ascii_delimiter_is_a_config_error() {
        let err = config_with_source(&data_args(&["--delimiter", "§"]), "x.csv".to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn explicit_source_wins_over_environment() {
        let args = data_args(&["--source", "https://example.org/a.csv"]);
        let config = dashboard_config_from_args(&args).unwrap();
        assert_eq!(config.source, "https://example.org/a.csv");
    }

    #[test]
    fn build_and_plot_flags_parse() {
        let cli = Cli::try_parse_from([
            "econdash", "build", "--format", "json", "--out", "specs", "--width", "640",
        ])
        .unwrap();
        let Command::Build(b) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(b.format, OutputFormat::Json);
        assert_eq!(b.out, Some(PathBuf::from("specs")));
        assert_eq!(b.width, Some(640));
        assert_eq!(b.height, 320);

        let cli = Cli::try_parse_from([
            "econdash", "plot", "--metric", "inflation-yoy", "--hover", "2020-04-01",
        ])
        .unwrap();
        let Command::Plot(p) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(p.metric, crate::domain::Metric::InflationYoy);
        assert_eq!(p.hover.as_deref(), Some("2020-04-01"));
    }
}
