//! Chart spec builders for the dashboard.
//!
//! Every builder takes normalized rows and returns a complete Vega-Lite
//! document. Line charts get a crosshair whose selection parameter name comes
//! from a shared [`ParamNamer`], so names never collide within a document.

use serde_json::{Map, Value};

use crate::chart::crosshair::{Crosshair, ParamNamer, ensure_unique_params};
use crate::chart::spec::{
    ChartSpec, Data, Encoding, FieldDef, Mark, MarkType, Resolve, Transform, Width,
};
use crate::data::dates::date_to_x;
use crate::domain::{ChartLayout, ColumnMap, Metric, NormalizedRow};
use crate::error::AppError;
use crate::math::fit_line;

/// Field holding the fitted GDP trend in the GDP chart's data.
pub const TREND_FIELD: &str = "gdp_trend";

/// Target of the stacked composite.
pub const COMPOSITE_TARGET: &str = "dashboard";

const DATE_FIELD: &str = "date";
const SECONDARY_COLOR: &str = "#d62728";
const TREND_COLOR: &str = "#7f7f7f";

/// A chart bound to a named display region.
#[derive(Debug, Clone)]
pub struct NamedChart {
    pub target: String,
    pub title: String,
    pub spec: ChartSpec,
}

/// Everything the renderers need for one load.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub charts: Vec<NamedChart>,
    /// Stacked panels, one per tracked metric; `None` when nothing is tracked.
    pub composite: Option<NamedChart>,
}

impl Dashboard {
    /// Individual charts first, then the composite.
    pub fn all(&self) -> impl Iterator<Item = &NamedChart> {
        self.charts.iter().chain(self.composite.iter())
    }

    pub fn len(&self) -> usize {
        self.charts.len() + usize::from(self.composite.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build all charts for the tracked metrics.
pub fn build_dashboard(
    rows: &[NormalizedRow],
    columns: &ColumnMap,
    layout: &ChartLayout,
) -> Result<Dashboard, AppError> {
    let tracked = columns.tracked();
    let mut namer = ParamNamer::new();
    let mut charts = Vec::new();

    for metric in &tracked {
        let spec = if *metric == Metric::GdpBillions {
            gdp_trend_spec(rows, layout, &mut namer)
        } else {
            metric_line_spec(rows, *metric, layout, &mut namer)
        };
        charts.push(NamedChart {
            target: metric.slug().to_string(),
            title: metric.title().to_string(),
            spec,
        });
    }

    if columns.is_tracked(Metric::UnemploymentRate) && columns.is_tracked(Metric::InflationYoy) {
        charts.push(NamedChart {
            target: "labor-prices".to_string(),
            title: "Unemployment vs inflation over time".to_string(),
            spec: labor_prices_spec(rows, layout, &mut namer),
        });
        charts.push(NamedChart {
            target: "phillips".to_string(),
            title: "Unemployment vs inflation".to_string(),
            spec: scatter_spec(rows, layout),
        });
    }

    let composite = (!tracked.is_empty()).then(|| NamedChart {
        target: COMPOSITE_TARGET.to_string(),
        title: "Economic indicators".to_string(),
        spec: composite_spec(rows, &tracked, layout, &mut ParamNamer::new()),
    });

    let dashboard = Dashboard { charts, composite };
    for chart in dashboard.all() {
        ensure_unique_params(&chart.spec)?;
    }

    tracing::debug!(charts = dashboard.len(), panels = tracked.len(), "built chart specs");

    Ok(dashboard)
}

/// Single metric over time with a crosshair.
pub fn metric_line_spec(
    rows: &[NormalizedRow],
    metric: Metric,
    layout: &ChartLayout,
    namer: &mut ParamNamer,
) -> ChartSpec {
    let crosshair = metric_crosshair(metric, namer.name(metric.slug()));

    let mut layer = vec![line_layer(metric)];
    layer.extend(crosshair.layers());

    ChartSpec {
        title: Some(metric.title().to_string()),
        width: Some(width(layout)),
        height: Some(layout.height),
        data: Some(data_values(rows)),
        transform: valid_filter(&[DATE_FIELD, metric.field()]),
        layer,
        ..ChartSpec::document()
    }
}

/// GDP level with a least-squares trend line and a crosshair.
pub fn gdp_trend_spec(rows: &[NormalizedRow], layout: &ChartLayout, namer: &mut ParamNamer) -> ChartSpec {
    let metric = Metric::GdpBillions;
    let mut values = rows_to_values(rows);

    let points: Vec<(usize, f64, f64)> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, r)| Some((i, date_to_x(&r.date)?, r.gdp_billions?)))
        .collect();
    let xy: Vec<(f64, f64)> = points.iter().map(|&(_, x, y)| (x, y)).collect();

    let trend = fit_line(&xy);
    if let Some(fit) = trend {
        for &(i, x, _) in &points {
            if let Some(Value::Object(obj)) = values.get_mut(i) {
                obj.insert(TREND_FIELD.to_string(), round_value(fit.predict(x)));
            }
        }
    } else {
        tracing::debug!(points = xy.len(), "not enough dated GDP points for a trend line");
    }

    let mut tooltip = base_tooltip(metric);
    if trend.is_some() {
        tooltip.push(FieldDef::quantitative(TREND_FIELD).title("Trend").format(",.1f"));
    }
    let crosshair = Crosshair::new(namer.name(metric.slug()), DATE_FIELD, metric.field()).tooltip(tooltip);

    let mut layer = vec![line_layer(metric)];
    if trend.is_some() {
        layer.push(ChartSpec::unit(
            Mark::new(MarkType::Line).dashed([6, 4]).color(TREND_COLOR),
            Encoding {
                x: Some(FieldDef::temporal(DATE_FIELD)),
                y: Some(FieldDef::quantitative(TREND_FIELD).title(metric.title()).unzeroed()),
                ..Encoding::default()
            },
        ));
    }
    layer.extend(crosshair.layers());

    ChartSpec {
        title: Some("GDP trend".to_string()),
        width: Some(width(layout)),
        height: Some(layout.height),
        data: Some(Data { values }),
        transform: valid_filter(&[DATE_FIELD, metric.field()]),
        layer,
        ..ChartSpec::document()
    }
}

/// Unemployment and inflation on independent y scales, inflation dashed.
pub fn labor_prices_spec(rows: &[NormalizedRow], layout: &ChartLayout, namer: &mut ParamNamer) -> ChartSpec {
    let unemp = Metric::UnemploymentRate;
    let infl = Metric::InflationYoy;

    let mut tooltip = base_tooltip(unemp);
    tooltip.push(FieldDef::quantitative(infl.field()).title(infl.title()).format(".2f"));

    let crosshair = Crosshair::new(namer.name("labor_prices"), DATE_FIELD, unemp.field())
        .without_horizontal()
        .tooltip(tooltip);

    // The crosshair shares the unemployment scale, so it lives in that sub-layer.
    let mut primary = vec![line_layer(unemp)];
    primary.extend(crosshair.layers());

    let secondary = ChartSpec::unit(
        Mark::new(MarkType::Line).dashed([6, 4]).color(SECONDARY_COLOR),
        Encoding {
            x: Some(FieldDef::temporal(DATE_FIELD)),
            y: Some(FieldDef::quantitative(infl.field()).title(infl.title()).unzeroed()),
            ..Encoding::default()
        },
    );

    ChartSpec {
        title: Some("Unemployment vs inflation over time".to_string()),
        width: Some(width(layout)),
        height: Some(layout.height),
        data: Some(data_values(rows)),
        transform: valid_filter(&[DATE_FIELD, unemp.field(), infl.field()]),
        layer: vec![
            ChartSpec {
                layer: primary,
                ..ChartSpec::default()
            },
            secondary,
        ],
        resolve: Some(Resolve::independent_y()),
        ..ChartSpec::document()
    }
}

/// Unemployment (x) vs inflation (y), colored by year. No time ordering.
pub fn scatter_spec(rows: &[NormalizedRow], layout: &ChartLayout) -> ChartSpec {
    let unemp = Metric::UnemploymentRate;
    let infl = Metric::InflationYoy;

    let mut transform = valid_filter(&[DATE_FIELD, unemp.field(), infl.field()]);
    transform.push(Transform::calculate(format!("year(datum.{DATE_FIELD})"), "year"));

    ChartSpec {
        title: Some("Unemployment vs inflation".to_string()),
        width: Some(width(layout)),
        height: Some(layout.height + 20),
        data: Some(data_values(rows)),
        transform,
        mark: Some(Mark::new(MarkType::Point).filled().opacity(0.65)),
        encoding: Some(Encoding {
            x: Some(FieldDef::quantitative(unemp.field()).title(unemp.title()).unzeroed()),
            y: Some(FieldDef::quantitative(infl.field()).title(infl.title()).unzeroed()),
            color: Some(FieldDef::quantitative("year").title("Year")),
            tooltip: vec![
                FieldDef::temporal(DATE_FIELD).title("Date").format("%Y-%m-%d"),
                FieldDef::quantitative(unemp.field()).title(unemp.title()),
                FieldDef::quantitative(infl.field()).title(infl.title()),
            ],
            ..Encoding::default()
        }),
        ..ChartSpec::document()
    }
}

/// Vertically stacked metric panels sharing one data set.
///
/// Each panel owns its own selection parameter.
pub fn composite_spec(
    rows: &[NormalizedRow],
    metrics: &[Metric],
    layout: &ChartLayout,
    namer: &mut ParamNamer,
) -> ChartSpec {
    let panels = metrics
        .iter()
        .map(|metric| {
            let crosshair = metric_crosshair(*metric, namer.name(metric.slug()));
            let mut layer = vec![line_layer(*metric)];
            layer.extend(crosshair.layers());
            ChartSpec {
                title: Some(metric.title().to_string()),
                width: Some(width(layout)),
                height: Some(layout.panel_height),
                transform: valid_filter(&[DATE_FIELD, metric.field()]),
                layer,
                ..ChartSpec::default()
            }
        })
        .collect();

    ChartSpec {
        title: Some("Economic indicators".to_string()),
        data: Some(data_values(rows)),
        vconcat: panels,
        ..ChartSpec::document()
    }
}

fn metric_crosshair(metric: Metric, param: String) -> Crosshair {
    Crosshair::new(param, DATE_FIELD, metric.field()).tooltip(base_tooltip(metric))
}

fn base_tooltip(metric: Metric) -> Vec<FieldDef> {
    let format = match metric {
        Metric::GdpBillions => ",.1f",
        _ => ".2f",
    };
    vec![
        FieldDef::temporal(DATE_FIELD).title("Date").format("%Y-%m-%d"),
        FieldDef::quantitative(metric.field()).title(metric.title()).format(format),
    ]
}

fn line_layer(metric: Metric) -> ChartSpec {
    ChartSpec::unit(
        Mark::new(MarkType::Line).stroke_width(2.0),
        Encoding {
            x: Some(FieldDef::temporal(DATE_FIELD).title("Date")),
            y: Some(FieldDef::quantitative(metric.field()).title(metric.title()).unzeroed()),
            ..Encoding::default()
        },
    )
}

fn valid_filter(fields: &[&str]) -> Vec<Transform> {
    let expr = fields
        .iter()
        .map(|f| format!("isValid(datum.{f})"))
        .collect::<Vec<_>>()
        .join(" && ");
    vec![Transform::filter_expr(expr)]
}

fn width(layout: &ChartLayout) -> Width {
    layout.width.map(Width::Pixels).unwrap_or(Width::Container)
}

fn data_values(rows: &[NormalizedRow]) -> Data {
    Data {
        values: rows_to_values(rows),
    }
}

/// Serialize rows as Vega-Lite inline data (nulls kept as JSON `null`).
pub fn rows_to_values(rows: &[NormalizedRow]) -> Vec<Value> {
    rows.iter()
        .map(|r| serde_json::to_value(r).unwrap_or_else(|_| Value::Object(Map::new())))
        .collect()
}

fn round_value(v: f64) -> Value {
    let rounded = (v * 100.0).round() / 100.0;
    serde_json::Number::from_f64(rounded)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rows() -> Vec<NormalizedRow> {
        let data = [
            ("2019-01-01", 21001.6, 3.1, 3.9, 1.6),
            ("2019-04-01", 21289.3, 2.5, 3.6, 1.8),
            ("2019-07-01", 21505.0, 2.4, 3.6, 1.8),
            ("2019-10-01", 21694.5, 2.6, 3.6, 2.0),
        ];
        data.iter()
            .map(|&(d, g, gr, u, i)| NormalizedRow {
                date: d.to_string(),
                gdp_billions: Some(g),
                gdp_growth_yoy: Some(gr),
                unemployment_rate: Some(u),
                inflation_yoy: Some(i),
            })
            .collect()
    }

    fn layout() -> ChartLayout {
        ChartLayout::default()
    }

    #[test]
    fn metric_line_has_temporal_x_and_quantitative_y() {
        let spec = metric_line_spec(&rows(), Metric::UnemploymentRate, &layout(), &mut ParamNamer::new());
        let v = spec.to_json();
        assert_eq!(v["$schema"], crate::chart::spec::VEGA_LITE_SCHEMA);
        assert_eq!(v["width"], "container");
        assert_eq!(v["data"]["values"].as_array().unwrap().len(), 4);
        let line = &v["layer"][0];
        assert_eq!(line["mark"]["type"], "line");
        assert_eq!(line["encoding"]["x"]["field"], "date");
        assert_eq!(line["encoding"]["x"]["type"], "temporal");
        assert_eq!(line["encoding"]["y"]["field"], "unemployment_rate");
        assert_eq!(line["encoding"]["y"]["type"], "quantitative");
        assert_eq!(spec.param_names(), vec!["hover_unemployment"]);
    }

    #[test]
    fn composite_panels_have_distinct_params() {
        let metrics = Metric::ALL.to_vec();
        let spec = composite_spec(&rows(), &metrics, &layout(), &mut ParamNamer::new());
        assert_eq!(spec.vconcat.len(), 4);

        let names = spec.param_names();
        assert_eq!(names.len(), 4);
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
        assert!(ensure_unique_params(&spec).is_ok());
    }

    #[test]
    fn composite_with_repeated_metric_still_has_distinct_params() {
        let metrics = vec![Metric::InflationYoy, Metric::InflationYoy];
        let spec = composite_spec(&rows(), &metrics, &layout(), &mut ParamNamer::new());
        let names = spec.param_names();
        assert_eq!(names, vec!["hover_inflation", "hover_inflation_2"]);

        // Each panel's crosshair layers reference only its own parameter.
        for (panel, name) in spec.vconcat.iter().zip(&names) {
            let json = panel.to_json().to_string();
            assert!(json.contains(&format!("\"param\":\"{name}\"")));
            for other in names.iter().filter(|n| *n != name) {
                assert!(!json.contains(&format!("\"param\":\"{other}\"")));
            }
        }
    }

    #[test]
    fn scatter_derives_year_and_has_no_selection() {
        let spec = scatter_spec(&rows(), &layout());
        let v = spec.to_json();
        assert_eq!(v["transform"][1]["calculate"], "year(datum.date)");
        assert_eq!(v["transform"][1]["as"], "year");
        assert_eq!(v["encoding"]["color"]["field"], "year");
        assert_eq!(v["encoding"]["x"]["field"], "unemployment_rate");
        assert_eq!(v["encoding"]["y"]["field"], "inflation_yoy");
        assert!(spec.param_names().is_empty());
    }

    #[test]
    fn gdp_trend_adds_fitted_values() {
        let spec = gdp_trend_spec(&rows(), &layout(), &mut ParamNamer::new());
        let v = spec.to_json();
        let values = v["data"]["values"].as_array().unwrap();
        assert!(values.iter().all(|row| row[TREND_FIELD].is_number()));
        let first = values[0][TREND_FIELD].as_f64().unwrap();
        let last = values[3][TREND_FIELD].as_f64().unwrap();
        assert!(last > first);
        assert_eq!(v["layer"][1]["encoding"]["y"]["field"], TREND_FIELD);
    }

    #[test]
    fn gdp_trend_without_enough_points_skips_trend_layer() {
        let spec = gdp_trend_spec(&rows()[..1], &layout(), &mut ParamNamer::new());
        let v = spec.to_json();
        assert!(v["data"]["values"][0].get(TREND_FIELD).is_none());
        // line + 3 crosshair layers
        assert_eq!(spec.layer.len(), 4);
    }

    #[test]
    fn labor_prices_resolves_y_independently() {
        let spec = labor_prices_spec(&rows(), &layout(), &mut ParamNamer::new());
        let v = spec.to_json();
        assert_eq!(v["resolve"]["scale"]["y"], "independent");
        assert_eq!(v["layer"][1]["mark"]["strokeDash"], serde_json::json!([6, 4]));
        assert_eq!(spec.param_names(), vec!["hover_labor_prices"]);
    }

    #[test]
    fn dashboard_only_builds_tracked_charts() {
        let mut columns = ColumnMap::canonical();
        columns.set_column(Metric::InflationYoy, None);
        columns.set_column(Metric::GdpGrowthYoy, None);

        let dash = build_dashboard(&rows(), &columns, &layout()).unwrap();
        let targets: Vec<&str> = dash.charts.iter().map(|c| c.target.as_str()).collect();
        assert_eq!(targets, vec!["gdp", "unemployment"]);
        assert_eq!(dash.composite.unwrap().spec.vconcat.len(), 2);
    }

    #[test]
    fn dashboard_with_all_metrics() {
        let dash = build_dashboard(&rows(), &ColumnMap::canonical(), &layout()).unwrap();
        let targets: Vec<&str> = dash.charts.iter().map(|c| c.target.as_str()).collect();
        assert_eq!(
            targets,
            vec!["gdp", "growth", "unemployment", "inflation", "labor-prices", "phillips"]
        );
        assert_eq!(dash.all().last().unwrap().target, COMPOSITE_TARGET);
        assert_eq!(dash.len(), 7);
    }

    #[test]
    fn dashboard_without_tracked_metrics_is_empty() {
        let mut columns = ColumnMap::canonical();
        for m in Metric::ALL {
            columns.set_column(m, None);
        }
        let dash = build_dashboard(&rows(), &columns, &layout()).unwrap();
        assert!(dash.is_empty());
    }

    #[test]
    fn null_values_stay_null_in_data() {
        let mut r = rows();
        r[1].inflation_yoy = None;
        let values = rows_to_values(&r);
        assert!(values[1]["inflation_yoy"].is_null());
    }
}
