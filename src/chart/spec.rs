//! Typed subset of the Vega-Lite v5 grammar.
//!
//! Only the pieces the dashboard emits are modeled. Every optional member is
//! skipped when empty so the serialized JSON stays close to a hand-written spec.

use serde::ser::Serializer;
use serde::Serialize;
use serde_json::Value;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// A (possibly nested) Vega-Lite view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<Transform>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<Mark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub layer: Vec<ChartSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vconcat: Vec<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve: Option<Resolve>,
}

impl ChartSpec {
    /// Top-level document with the schema URL set.
    pub fn document() -> Self {
        Self {
            schema: Some(VEGA_LITE_SCHEMA.to_string()),
            ..Self::default()
        }
    }

    /// Unit view with a mark and encoding.
    pub fn unit(mark: Mark, encoding: Encoding) -> Self {
        Self {
            mark: Some(mark),
            encoding: Some(encoding),
            ..Self::default()
        }
    }

    /// All parameter names declared anywhere in this view, depth-first.
    pub fn param_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_param_names(&mut out);
        out
    }

    fn collect_param_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.extend(self.params.iter().map(|p| p.name.as_str()));
        for child in self.layer.iter().chain(self.vconcat.iter()) {
            child.collect_param_names(out);
        }
    }

    pub fn to_json(&self) -> Value {
        // Serialization of these plain structs cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// View width: fixed pixels or stretch to the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Pixels(u32),
    Container,
}

impl Serialize for Width {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Width::Pixels(px) => serializer.serialize_u32(*px),
            Width::Container => serializer.serialize_str("container"),
        }
    }
}

/// Inline data values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Data {
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Transform {
    Filter {
        filter: Predicate,
    },
    Calculate {
        calculate: String,
        #[serde(rename = "as")]
        as_field: String,
    },
}

impl Transform {
    pub fn filter_expr(expr: impl Into<String>) -> Self {
        Transform::Filter {
            filter: Predicate::Expr(expr.into()),
        }
    }

    /// Keep only data selected by `param` (nothing while the selection is empty).
    pub fn filter_param(param: impl Into<String>) -> Self {
        Transform::Filter {
            filter: Predicate::Param {
                param: param.into(),
                empty: false,
            },
        }
    }

    pub fn calculate(expr: impl Into<String>, as_field: impl Into<String>) -> Self {
        Transform::Calculate {
            calculate: expr.into(),
            as_field: as_field.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Predicate {
    Expr(String),
    Param { param: String, empty: bool },
}

/// A named selection parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub select: PointSelection,
}

/// `{"type": "point", ...}` selection definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSelection {
    #[serde(rename = "type")]
    pub kind: SelectionKind,
    pub nearest: bool,
    pub on: String,
    pub clear: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Line,
    Point,
    Rule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_dash: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl Mark {
    pub fn new(kind: MarkType) -> Self {
        Self {
            kind,
            stroke_dash: None,
            filled: None,
            opacity: None,
            size: None,
            color: None,
            stroke_width: None,
        }
    }

    pub fn dashed(mut self, dash: [u32; 2]) -> Self {
        self.stroke_dash = Some(dash.to_vec());
        self
    }

    pub fn filled(mut self) -> Self {
        self.filled = Some(true);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<FieldDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<ConditionalValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<FieldDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Temporal,
    Quantitative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
}

impl FieldDef {
    pub fn new(field: impl Into<String>, kind: FieldType) -> Self {
        Self {
            field: field.into(),
            kind,
            title: None,
            format: None,
            scale: None,
        }
    }

    pub fn temporal(field: impl Into<String>) -> Self {
        Self::new(field, FieldType::Temporal)
    }

    pub fn quantitative(field: impl Into<String>) -> Self {
        Self::new(field, FieldType::Quantitative)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Let the axis start near the data instead of at zero.
    pub fn unzeroed(mut self) -> Self {
        self.scale = Some(Scale { zero: false });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scale {
    pub zero: bool,
}

/// `{"condition": {"param": ..., "empty": false, "value": v}, "value": otherwise}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalValue {
    pub condition: ParamCondition,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamCondition {
    pub param: String,
    pub empty: bool,
    pub value: f64,
}

impl ConditionalValue {
    /// `active` while `param` selects the datum, `inactive` otherwise.
    pub fn when_selected(param: impl Into<String>, active: f64, inactive: f64) -> Self {
        Self {
            condition: ParamCondition {
                param: param.into(),
                empty: false,
                value: active,
            },
            value: inactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolve {
    pub scale: ResolveScale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveScale {
    pub y: ResolveMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    Independent,
}

impl Resolve {
    pub fn independent_y() -> Self {
        Self {
            scale: ResolveScale {
                y: ResolveMode::Independent,
            },
        }
    }
}
