//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built fresh on every load/render cycle
//! - embedded into chart specs as data values
//! - compared in tests without any I/O

use std::collections::HashMap;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// One of the four tracked economic indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    GdpBillions,
    GdpGrowthYoy,
    UnemploymentRate,
    InflationYoy,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::GdpBillions,
        Metric::GdpGrowthYoy,
        Metric::UnemploymentRate,
        Metric::InflationYoy,
    ];

    /// Canonical field name used in normalized rows and chart specs.
    pub fn field(self) -> &'static str {
        match self {
            Metric::GdpBillions => "gdp_billions",
            Metric::GdpGrowthYoy => "gdp_growth_yoy",
            Metric::UnemploymentRate => "unemployment_rate",
            Metric::InflationYoy => "inflation_yoy",
        }
    }

    /// Human-readable axis/tooltip title.
    pub fn title(self) -> &'static str {
        match self {
            Metric::GdpBillions => "GDP (billions USD)",
            Metric::GdpGrowthYoy => "GDP growth YoY (%)",
            Metric::UnemploymentRate => "Unemployment rate (%)",
            Metric::InflationYoy => "Inflation YoY (%)",
        }
    }

    /// Header names tried, in order and case-insensitively, when no column is given.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Metric::GdpBillions => &["gdp_billions", "gdp", "gdp_level", "real_gdp"],
            Metric::GdpGrowthYoy => &["gdp_growth_yoy", "gdp_growth", "growth", "gdp_yoy"],
            Metric::UnemploymentRate => &["unemployment_rate", "unemployment", "unemp", "unrate"],
            Metric::InflationYoy => &[
                "inflation_yoy",
                "inflation",
                "inflation_rate",
                "cpi_inflation",
                "infl",
            ],
        }
    }

    /// Short name used as a chart target and JSON file stem.
    pub fn slug(self) -> &'static str {
        match self {
            Metric::GdpBillions => "gdp",
            Metric::GdpGrowthYoy => "growth",
            Metric::UnemploymentRate => "unemployment",
            Metric::InflationYoy => "inflation",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Metric::GdpBillions => Metric::GdpGrowthYoy,
            Metric::GdpGrowthYoy => Metric::UnemploymentRate,
            Metric::UnemploymentRate => Metric::InflationYoy,
            Metric::InflationYoy => Metric::GdpBillions,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Metric::GdpBillions => Metric::InflationYoy,
            Metric::GdpGrowthYoy => Metric::GdpBillions,
            Metric::UnemploymentRate => Metric::GdpGrowthYoy,
            Metric::InflationYoy => Metric::UnemploymentRate,
        }
    }
}

/// Header names tried for the date column.
pub const DATE_ALIASES: [&str; 5] = ["date", "observation_date", "time", "quarter", "year"];

/// A parsed CSV record: header name -> raw (trimmed) string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip headers and values positionally.
    ///
    /// A repeated header keeps the last value, mirroring plain object assignment.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut row = Self::new();
        for (name, value) in pairs {
            row.insert(name, value);
        }
        row
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A row skipped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the source text.
    pub line: usize,
    pub message: String,
}

/// Parser output: ordered headers, well-formed rows, and what was skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub skipped: Vec<RowError>,
}

/// Resolved source columns for one load.
///
/// A metric with `None` is untracked: the file has no column for it, so its
/// normalized value is always null and it never causes a row to be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: String,
    pub gdp_billions: Option<String>,
    pub gdp_growth_yoy: Option<String>,
    pub unemployment_rate: Option<String>,
    pub inflation_yoy: Option<String>,
}

impl ColumnMap {
    /// Column map for files that already use the canonical field names.
    pub fn canonical() -> Self {
        Self {
            date: "date".to_string(),
            gdp_billions: Some(Metric::GdpBillions.field().to_string()),
            gdp_growth_yoy: Some(Metric::GdpGrowthYoy.field().to_string()),
            unemployment_rate: Some(Metric::UnemploymentRate.field().to_string()),
            inflation_yoy: Some(Metric::InflationYoy.field().to_string()),
        }
    }

    pub fn column(&self, metric: Metric) -> Option<&str> {
        let col = match metric {
            Metric::GdpBillions => &self.gdp_billions,
            Metric::GdpGrowthYoy => &self.gdp_growth_yoy,
            Metric::UnemploymentRate => &self.unemployment_rate,
            Metric::InflationYoy => &self.inflation_yoy,
        };
        col.as_deref()
    }

    pub fn set_column(&mut self, metric: Metric, column: Option<String>) {
        let slot = match metric {
            Metric::GdpBillions => &mut self.gdp_billions,
            Metric::GdpGrowthYoy => &mut self.gdp_growth_yoy,
            Metric::UnemploymentRate => &mut self.unemployment_rate,
            Metric::InflationYoy => &mut self.inflation_yoy,
        };
        *slot = column;
    }

    pub fn is_tracked(&self, metric: Metric) -> bool {
        self.column(metric).is_some()
    }

    /// Tracked metrics in canonical order.
    pub fn tracked(&self) -> Vec<Metric> {
        Metric::ALL.into_iter().filter(|m| self.is_tracked(*m)).collect()
    }
}

/// What to do with rows whose tracked metrics fail numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Drop the row if any tracked metric is null (charts cannot plot nulls).
    #[default]
    Drop,
    /// Keep the row with null values.
    Keep,
}

/// A typed row after numeric coercion and validity filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub date: String,
    pub gdp_billions: Option<f64>,
    pub gdp_growth_yoy: Option<f64>,
    pub unemployment_rate: Option<f64>,
    pub inflation_yoy: Option<f64>,
}

impl NormalizedRow {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            gdp_billions: None,
            gdp_growth_yoy: None,
            unemployment_rate: None,
            inflation_yoy: None,
        }
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::GdpBillions => self.gdp_billions,
            Metric::GdpGrowthYoy => self.gdp_growth_yoy,
            Metric::UnemploymentRate => self.unemployment_rate,
            Metric::InflationYoy => self.inflation_yoy,
        }
    }

    pub fn set_value(&mut self, metric: Metric, value: Option<f64>) {
        match metric {
            Metric::GdpBillions => self.gdp_billions = value,
            Metric::GdpGrowthYoy => self.gdp_growth_yoy = value,
            Metric::UnemploymentRate => self.unemployment_rate = value,
            Metric::InflationYoy => self.inflation_yoy = value,
        }
    }

    pub fn with_value(mut self, metric: Metric, value: f64) -> Self {
        self.set_value(metric, Some(value));
        self
    }
}

/// Explicit column names from the command line (`None` = pick by alias).
#[derive(Debug, Clone, Default)]
pub struct ColumnOverrides {
    pub date: Option<String>,
    pub gdp_billions: Option<String>,
    pub gdp_growth_yoy: Option<String>,
    pub unemployment_rate: Option<String>,
    pub inflation_yoy: Option<String>,
}

impl ColumnOverrides {
    pub fn metric(&self, metric: Metric) -> Option<&str> {
        let col = match metric {
            Metric::GdpBillions => &self.gdp_billions,
            Metric::GdpGrowthYoy => &self.gdp_growth_yoy,
            Metric::UnemploymentRate => &self.unemployment_rate,
            Metric::InflationYoy => &self.inflation_yoy,
        };
        col.as_deref()
    }
}

/// Output flavor for `econdash build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One self-contained HTML page with table, status, and embedded charts.
    Html,
    /// A directory of Vega-Lite JSON specs.
    Json,
}

/// Where the HTML page loads the chart library from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// jsDelivr CDN.
    Cdn,
    /// A local directory holding `vega.min.js`, `vega-lite.min.js`, `vega-embed.min.js`.
    Local(PathBuf),
}

/// Chart sizing shared by every generated spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    /// Fixed width in pixels; `None` stretches to the container.
    pub width: Option<u32>,
    pub height: u32,
    /// Height of each panel in the stacked composite.
    pub panel_height: u32,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: None,
            height: 320,
            panel_height: 180,
        }
    }
}

/// Everything a load/render cycle needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// `http(s)://` URL or local path of the CSV.
    pub source: String,
    pub delimiter: u8,
    pub columns: ColumnOverrides,
    pub missing_policy: MissingPolicy,
    /// Number of rows shown in the preview table.
    pub preview_limit: usize,
    pub layout: ChartLayout,
}

impl DashboardConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            delimiter: b',',
            columns: ColumnOverrides::default(),
            missing_policy: MissingPolicy::Drop,
            preview_limit: 20,
            layout: ChartLayout::default(),
        }
    }
}
