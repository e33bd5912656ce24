//! Crosshair sub-spec: nearest-point selection, alignment rules, and a
//! tooltip-carrying marker.
//!
//! Layers produced for one chart:
//!
//! 1. vertical rule at the selected date (declares the selection parameter)
//! 2. horizontal rule at the selected value (optional)
//! 3. marker filtered to the selected datum, carrying the tooltip
//!
//! Both rules are drawn for every datum but are only opaque for the selected
//! one, so nothing shows while the selection is empty.

use std::collections::HashSet;

use crate::chart::spec::{
    ChartSpec, ConditionalValue, Encoding, FieldDef, Mark, MarkType, Param, PointSelection,
    SelectionKind, Transform,
};
use crate::error::AppError;

const RULE_COLOR: &str = "#888888";
const RULE_OPACITY: f64 = 0.8;

/// Crosshair configuration for one chart.
#[derive(Debug, Clone)]
pub struct Crosshair {
    /// Selection parameter name; unique within a document.
    pub param: String,
    /// Temporal field the selection is keyed on.
    pub x_field: String,
    /// Quantitative field for the horizontal rule and marker.
    pub y_field: String,
    /// Draw the horizontal rule (skipped when the chart has several y scales).
    pub horizontal: bool,
    pub tooltip: Vec<FieldDef>,
}

impl Crosshair {
    pub fn new(param: impl Into<String>, x_field: &str, y_field: &str) -> Self {
        Self {
            param: param.into(),
            x_field: x_field.to_string(),
            y_field: y_field.to_string(),
            horizontal: true,
            tooltip: Vec::new(),
        }
    }

    pub fn without_horizontal(mut self) -> Self {
        self.horizontal = false;
        self
    }

    pub fn tooltip(mut self, fields: Vec<FieldDef>) -> Self {
        self.tooltip = fields;
        self
    }

    /// Point selection: nearest datum on pointer move, cleared on pointer out.
    pub fn selection(&self) -> Param {
        Param {
            name: self.param.clone(),
            select: PointSelection {
                kind: SelectionKind::Point,
                nearest: true,
                on: "pointermove".to_string(),
                clear: "pointerout".to_string(),
                fields: vec![self.x_field.clone()],
            },
        }
    }

    /// Layers to append to the chart's `layer` list.
    pub fn layers(&self) -> Vec<ChartSpec> {
        let mut layers = Vec::with_capacity(3);

        let vertical = ChartSpec {
            params: vec![self.selection()],
            ..ChartSpec::unit(
                Mark::new(MarkType::Rule).color(RULE_COLOR),
                Encoding {
                    x: Some(FieldDef::temporal(&self.x_field)),
                    opacity: Some(ConditionalValue::when_selected(&self.param, RULE_OPACITY, 0.0)),
                    tooltip: self.tooltip.clone(),
                    ..Encoding::default()
                },
            )
        };
        layers.push(vertical);

        if self.horizontal {
            layers.push(ChartSpec::unit(
                Mark::new(MarkType::Rule).color(RULE_COLOR).dashed([2, 2]),
                Encoding {
                    y: Some(FieldDef::quantitative(&self.y_field)),
                    opacity: Some(ConditionalValue::when_selected(&self.param, RULE_OPACITY, 0.0)),
                    ..Encoding::default()
                },
            ));
        }

        layers.push(ChartSpec {
            transform: vec![Transform::filter_param(&self.param)],
            ..ChartSpec::unit(
                Mark::new(MarkType::Point).filled().size(70.0),
                Encoding {
                    x: Some(FieldDef::temporal(&self.x_field)),
                    y: Some(FieldDef::quantitative(&self.y_field)),
                    tooltip: self.tooltip.clone(),
                    ..Encoding::default()
                },
            )
        });

        layers
    }
}

/// Hands out selection parameter names that are unique within one document.
#[derive(Debug, Default)]
pub struct ParamNamer {
    used: HashSet<String>,
}

impl ParamNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `hover_<base>`, suffixed `_2`, `_3`, ... on collision.
    pub fn name(&mut self, base: &str) -> String {
        let stem = format!("hover_{}", sanitize(base));
        let mut candidate = stem.clone();
        let mut n = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{stem}_{n}");
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Reject a document that declares the same parameter name twice.
pub fn ensure_unique_params(spec: &ChartSpec) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for name in spec.param_names() {
        if !seen.insert(name) {
            return Err(AppError::render(format!(
                "Selection parameter `{name}` is declared more than once in one chart document."
            )));
        }
    }
    Ok(())
}

/// Vega expression identifiers: ASCII letters, digits, underscore.
fn sanitize(base: &str) -> String {
    let s: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if s.is_empty() { "chart".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_nearest_on_pointer_move() {
        let c = Crosshair::new("hover_gdp", "date", "gdp_billions");
        let v = serde_json::to_value(c.selection()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "name": "hover_gdp",
                "select": {
                    "type": "point",
                    "nearest": true,
                    "on": "pointermove",
                    "clear": "pointerout",
                    "fields": ["date"]
                }
            })
        );
    }

    #[test]
    fn layers_bind_rules_and_marker_to_the_param() {
        let c = Crosshair::new("hover_u", "date", "unemployment_rate");
        let layers = c.layers();
        assert_eq!(layers.len(), 3);

        // Only the first layer declares the parameter.
        assert_eq!(layers[0].params.len(), 1);
        assert!(layers[1].params.is_empty());
        assert!(layers[2].params.is_empty());

        for rule in &layers[..2] {
            assert_eq!(rule.mark.as_ref().unwrap().kind, MarkType::Rule);
            let opacity = rule.encoding.as_ref().unwrap().opacity.as_ref().unwrap();
            assert_eq!(opacity.condition.param, "hover_u");
            assert!(!opacity.condition.empty);
            assert_eq!(opacity.value, 0.0);
        }

        let marker = &layers[2];
        assert_eq!(marker.mark.as_ref().unwrap().kind, MarkType::Point);
        let v = marker.to_json();
        assert_eq!(v["transform"][0]["filter"]["param"], "hover_u");
        assert_eq!(v["transform"][0]["filter"]["empty"], false);
    }

    #[test]
    fn horizontal_rule_is_optional() {
        let c = Crosshair::new("h", "date", "x").without_horizontal();
        let layers = c.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1].mark.as_ref().unwrap().kind, MarkType::Point);
    }

    #[test]
    fn namer_never_repeats() {
        let mut namer = ParamNamer::new();
        let a = namer.name("gdp");
        let b = namer.name("gdp");
        let c = namer.name("GDP");
        let d = namer.name("labor-prices");
        assert_eq!(a, "hover_gdp");
        assert_eq!(b, "hover_gdp_2");
        assert_eq!(c, "hover_gdp_3");
        assert_eq!(d, "hover_labor_prices");
    }

    #[test]
    fn duplicate_params_are_rejected() {
        let c = Crosshair::new("same", "date", "y");
        let doc = ChartSpec {
            vconcat: vec![
                ChartSpec {
                    layer: c.layers(),
                    ..ChartSpec::default()
                },
                ChartSpec {
                    layer: c.layers(),
                    ..ChartSpec::default()
                },
            ],
            ..ChartSpec::document()
        };
        let err = ensure_unique_params(&doc).unwrap_err();
        assert!(err.message().contains("same"));
    }
}
