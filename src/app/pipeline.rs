//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> parse -> resolve columns -> normalize -> build chart specs -> render
//!
//! The CLI and the TUI can then focus on presentation (files and printing vs widgets).
//! Every step reports into the `StatusBoard` it is handed.

use std::path::PathBuf;

use crate::chart::{Dashboard, build_dashboard};
use crate::data::{NormalizeStats, normalize_rows, resolve_columns};
use crate::domain::{ColumnMap, DashboardConfig, NormalizedRow, ParsedTable};
use crate::error::AppError;
use crate::io::{CsvLoader, DataSource, parse_csv};
use crate::render::{ChartRenderer, EmbedOptions, PageParts, RenderReport, render_charts};
use crate::report::{StatusBoard, html_table};

pub const PAGE_TITLE: &str = "US economic indicators";

/// All computed outputs of one load.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub source: DataSource,
    /// Parsed file as-is; the preview table shows this.
    pub table: ParsedTable,
    pub columns: ColumnMap,
    pub rows: Vec<NormalizedRow>,
    pub stats: NormalizeStats,
    pub dashboard: Dashboard,
}

impl DashboardRun {
    /// Data lines read, including malformed ones.
    pub fn lines_read(&self) -> usize {
        self.stats.read + self.table.skipped.len()
    }

    /// Malformed plus filtered-out lines.
    pub fn lines_skipped(&self) -> usize {
        self.table.skipped.len() + self.stats.dropped()
    }
}

/// Fetch and process the configured source.
///
/// A fetch failure aborts before anything else is produced.
pub fn run_dashboard(
    config: &DashboardConfig,
    loader: &CsvLoader,
    status: &mut StatusBoard,
) -> Result<DashboardRun, AppError> {
    let source = DataSource::parse(&config.source);
    status.clear_error();
    status.loading(source.path());

    let result = loader
        .load(&source)
        .and_then(|text| run_with_text(config, source.clone(), &text, status));
    if let Err(e) = &result {
        tracing::error!(path = source.path(), error = %e, "dashboard load failed");
        status.error(e);
    }
    result
}

/// Process already-loaded CSV text.
pub fn run_with_text(
    config: &DashboardConfig,
    source: DataSource,
    text: &str,
    status: &mut StatusBoard,
) -> Result<DashboardRun, AppError> {
    let table = parse_csv(text, config.delimiter)?;
    let columns = resolve_columns(&table.headers, &config.columns)?;
    let (rows, stats) = normalize_rows(&table.rows, &columns, config.missing_policy);

    let mut run = DashboardRun {
        source,
        table,
        columns,
        rows,
        stats,
        dashboard: Dashboard::default(),
    };
    status.loaded(run.source.path());
    status.rows(run.stats.kept, run.lines_read(), run.lines_skipped());

    if run.rows.is_empty() {
        return Err(AppError::data(format!(
            "No usable rows in {} ({} read, {} skipped).",
            run.source.path(),
            run.lines_read(),
            run.lines_skipped()
        )));
    }
    if run.columns.tracked().is_empty() {
        tracing::warn!(headers = ?run.table.headers, "no indicator columns recognized");
    }

    run.dashboard = build_dashboard(&run.rows, &run.columns, &config.layout)?;
    Ok(run)
}

/// Embed every chart and write the output.
///
/// The page (or spec directory) is written even when some charts failed; the
/// failure is returned afterwards.
pub fn render_run(
    run: &DashboardRun,
    config: &DashboardConfig,
    renderer: &mut dyn ChartRenderer,
    options: &EmbedOptions,
    status: &mut StatusBoard,
) -> Result<(PathBuf, RenderReport), AppError> {
    if let Err(e) = renderer.ensure_available() {
        status.error(&e);
        return Err(e);
    }

    let report = render_charts(renderer, &run.dashboard, options, status);
    let parts = PageParts {
        title: PAGE_TITLE.to_string(),
        status: status.clone(),
        table_html: html_table(&run.table, config.preview_limit),
    };
    let path = renderer.finish(&parts)?;
    let report = report.into_result()?;
    Ok((path, report))
}

/// Load, process, and render in one go.
pub fn build_output(
    config: &DashboardConfig,
    loader: &CsvLoader,
    renderer: &mut dyn ChartRenderer,
    options: &EmbedOptions,
    status: &mut StatusBoard,
) -> Result<(DashboardRun, PathBuf), AppError> {
    let run = run_dashboard(config, loader, status)?;
    let (path, _) = render_run(&run, config, renderer, options, status)?;
    Ok((run, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetSource, Metric, MissingPolicy};
    use crate::error::ErrorKind;
    use crate::render::HtmlRenderer;
    use crate::test_support::{SAMPLE_CSV, test_loader};

    fn file_config(dir: &tempfile::TempDir, text: &str) -> DashboardConfig {
        let path = dir.path().join("indicators.csv");
        std::fs::write(&path, text).unwrap();
        DashboardConfig::new(path.display().to_string())
    }

    #[test]
    fn sample_file_builds_every_chart() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir, SAMPLE_CSV);
        let mut status = StatusBoard::new();

        let run = run_dashboard(&config, &test_loader(), &mut status).unwrap();
        assert_eq!(run.stats.kept, 8);
        assert_eq!(run.columns.tracked(), Metric::ALL.to_vec());
        assert_eq!(run.dashboard.len(), 7);
        assert_eq!(status.rows_line(), "Rows: 8 of 8 (skipped 0)");
        assert!(status.load_line().starts_with("Loaded "));
        assert!(!status.has_error());
    }

    #[test]
    fn strict_policy_keeps_only_complete_rows() {
        let mut status = StatusBoard::new();
        let config = DashboardConfig::new("inline.csv");
        let text = "date,unemployment_rate\n2020-01-01,5.5%\n2020-04-01,bad";
        let run = run_with_text(&config, DataSource::parse("inline.csv"), text, &mut status).unwrap();

        assert_eq!(run.rows.len(), 1);
        assert_eq!(run.rows[0].date, "2020-01-01");
        assert_eq!(run.rows[0].unemployment_rate, Some(5.5));
        assert_eq!(run.rows[0].gdp_billions, None);
        assert_eq!(status.rows_line(), "Rows: 1 of 2 (skipped 1)");

        let targets: Vec<&str> = run.dashboard.all().map(|c| c.target.as_str()).collect();
        assert_eq!(targets, vec!["unemployment", "dashboard"]);
    }

    #[test]
    fn malformed_lines_are_counted_as_skipped() {
        let mut status = StatusBoard::new();
        let mut config = DashboardConfig::new("inline.csv");
        config.missing_policy = MissingPolicy::Keep;
        let text = "date,inflation_yoy\n2020-01-01,1.5\n2020-04-01,2.0,extra\n2020-07-01,";
        let run = run_with_text(&config, DataSource::parse("inline.csv"), text, &mut status).unwrap();
        assert_eq!(run.rows.len(), 2);
        assert_eq!(status.rows_line(), "Rows: 2 of 3 (skipped 1)");
    }

    #[test]
    fn no_usable_rows_is_a_data_error() {
        let mut status = StatusBoard::new();
        let config = DashboardConfig::new("inline.csv");
        let text = "date,inflation_yoy\n2020-01-01,n/a";
        let err = run_with_text(&config, DataSource::parse("inline.csv"), text, &mut status).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
        assert_eq!(status.rows_line(), "Rows: 0 of 1 (skipped 1)");
    }

    #[test]
    fn not_found_reports_path_and_status_and_writes_nothing() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/data/us_economic_indicators.csv")
            .with_status(404)
            .create();
        let url = format!("{}/data/us_economic_indicators.csv", server.url());
        let config = DashboardConfig::new(url.clone());

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("index.html");
        let mut renderer = HtmlRenderer::new(&out, AssetSource::Cdn);
        let mut status = StatusBoard::new();

        let err = build_output(
            &config,
            &test_loader(),
            &mut renderer,
            &EmbedOptions::default(),
            &mut status,
        )
        .unwrap_err();

        mock.assert();
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(status.error_line().starts_with("Error: CSV not found:"));
        assert!(status.error_line().contains(&url));
        assert!(status.error_line().contains("404"));
        assert!(renderer.targets().is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn missing_local_library_stops_before_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir, SAMPLE_CSV);
        let out = dir.path().join("index.html");
        let mut renderer = HtmlRenderer::new(&out, AssetSource::Local(dir.path().join("assets")));
        let mut status = StatusBoard::new();

        let err = build_output(
            &config,
            &test_loader(),
            &mut renderer,
            &EmbedOptions::default(),
            &mut status,
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DependencyMissing);
        assert!(status.error_line().starts_with("Chart library missing:"));
        assert!(renderer.targets().is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn html_output_embeds_all_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir, SAMPLE_CSV);
        let out = dir.path().join("index.html");
        let mut renderer = HtmlRenderer::new(&out, AssetSource::Cdn);
        let mut status = StatusBoard::new();

        let (_, path) = build_output(
            &config,
            &test_loader(),
            &mut renderer,
            &EmbedOptions::default(),
            &mut status,
        )
        .unwrap();

        let html = std::fs::read_to_string(path).unwrap();
        for target in ["gdp", "growth", "unemployment", "inflation", "labor-prices", "phillips", "dashboard"] {
            assert!(html.contains(&format!("id=\"chart-{target}\"")), "{target}");
        }
        assert!(html.contains("Rows: 8 of 8 (skipped 0)"));
        assert!(html.contains("<td>13.0%</td>"));
    }
}
