//! Typed subset of the Vega-Lite v5 grammar: just enough to describe layered
//! spectrum charts, their hover selection, and stacked compositions.

use std::collections::BTreeMap;

use serde::Serialize;

use super::format::NumberFormat;
use crate::data::model::{ConvolutionSample, Stick};

pub const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// One inline data row: field name → value.
pub type Row = BTreeMap<String, f64>;

/// Inline data attached to a layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Data {
    pub values: Vec<Row>,
}

impl Data {
    pub fn from_convolution(series: &[ConvolutionSample]) -> Self {
        Self {
            values: series
                .iter()
                .map(|s| Row::from([("x".to_string(), s.x), ("y".to_string(), s.y)]))
                .collect(),
        }
    }

    pub fn from_sticks(series: &[Stick]) -> Self {
        Self {
            values: series
                .iter()
                .map(|s| {
                    Row::from([
                        ("poles".to_string(), s.poles),
                        ("residues".to_string(), s.residues),
                    ])
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Marks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Line,
    Circle,
    Rule,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkType,
    #[serde(rename = "strokeWidth", skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Mark {
    pub fn new(kind: MarkType) -> Self {
        Self {
            kind,
            stroke_width: None,
            size: None,
            opacity: None,
            color: None,
        }
    }

    pub fn stroke_width(mut self, w: f64) -> Self {
        self.stroke_width = Some(w);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i32>,
}

/// Field mapped onto the x or y channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionDef {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
}

impl PositionDef {
    pub fn quantitative(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldType::Quantitative,
            axis: None,
        }
    }

    pub fn axis(mut self, title: String, offset: Option<i32>) -> Self {
        self.axis = Some(Axis { title, offset });
        self
    }
}

/// A channel value that depends on whether a selection holds for the datum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalValue {
    pub condition: SelectionValue,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionValue {
    #[serde(flatten)]
    pub predicate: Predicate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(serialize_with = "serialize_display")]
    pub format: NumberFormat,
    pub title: String,
}

impl Tooltip {
    pub fn quantitative(field: &str, format: NumberFormat, title: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldType::Quantitative,
            format,
            title: title.to_string(),
        }
    }

    /// Tooltip line for `row`, as `"title: value"`.
    pub fn render(&self, row: &Row) -> Option<String> {
        row.get(&self.field)
            .map(|v| format!("{}: {}", self.title, self.format.format(*v)))
    }
}

fn serialize_display<S: serde::Serializer>(
    fmt: &NumberFormat,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(fmt)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<PositionDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<PositionDef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<ConditionalValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<Tooltip>,
}

impl Encoding {
    pub fn xy(x: PositionDef, y: PositionDef) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// Client-side interaction descriptor.  The chart only declares it; the
/// renderer owns the actual event handling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub name: String,
    pub select: SelectionDef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionDef {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Bound field(s).
    pub fields: Vec<String>,
    pub nearest: bool,
    /// Event that activates the selection.
    pub on: String,
    /// Event that clears it.
    pub clear: String,
}

impl Selection {
    /// Point selection following the pointer to the nearest value of `field`.
    pub fn nearest_hover(name: &str, field: &str) -> Self {
        Self {
            name: name.to_string(),
            select: SelectionDef {
                kind: "point",
                fields: vec![field.to_string()],
                nearest: true,
                on: "mouseover".to_string(),
                clear: "mouseout".to_string(),
            },
        }
    }

    /// Predicate that holds only for selected data; an empty selection
    /// matches nothing.
    pub fn predicate(&self) -> Predicate {
        Predicate {
            param: self.name.clone(),
            empty: false,
        }
    }

    /// `when_selected` while the selection holds for the datum, else
    /// `otherwise`.
    pub fn condition(&self, when_selected: f64, otherwise: f64) -> ConditionalValue {
        ConditionalValue {
            condition: SelectionValue {
                predicate: self.predicate(),
                value: when_selected,
            },
            value: otherwise,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub param: String,
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    Filter(Predicate),
}

// ---------------------------------------------------------------------------
// Layers and charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub mark: Mark,
    pub data: Data,
    pub encoding: Encoding,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transform: Vec<Transform>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Selection>,
}

impl Layer {
    pub fn new(mark: Mark, data: Data, encoding: Encoding) -> Self {
        Self {
            mark,
            data,
            encoding,
            transform: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.mark = mark;
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.transform.push(Transform::Filter(predicate));
        self
    }

    pub fn add_selection(mut self, selection: Selection) -> Self {
        self.params.push(selection);
        self
    }

    /// All values of `field` in this layer's data.
    pub fn field_values(&self, field: &str) -> Vec<f64> {
        self.data
            .values
            .iter()
            .filter_map(|row| row.get(field).copied())
            .collect()
    }

    /// Quantitative scale domain of `field`: its extent widened to include
    /// zero, as Vega-Lite does by default.  `None` for empty data.
    pub fn extent(&self, field: &str) -> Option<(f64, f64)> {
        let values = self.field_values(field);
        if values.is_empty() {
            return None;
        }
        let (lo, hi) = values
            .iter()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some((lo, hi))
    }

    fn rename_selection(&mut self, from: &str, to: &str) {
        for sel in &mut self.params {
            if sel.name == from {
                sel.name = to.to_string();
            }
        }
        for Transform::Filter(p) in &mut self.transform {
            if p.param == from {
                p.param = to.to_string();
            }
        }
        if let Some(op) = &mut self.encoding.opacity {
            if op.condition.predicate.param == from {
                op.condition.predicate.param = to.to_string();
            }
        }
    }
}

/// A layered chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub layer: Vec<Layer>,
}

impl Chart {
    pub fn layered(title: &str, layer: Vec<Layer>) -> Self {
        Self {
            title: title.to_string(),
            layer,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layer
    }

    /// Marks of the layers, bottom to top.
    pub fn mark_types(&self) -> Vec<MarkType> {
        self.layer.iter().map(|l| l.mark.kind).collect()
    }

    /// Names of the selections declared anywhere in the chart.
    pub fn selection_names(&self) -> Vec<&str> {
        self.layer
            .iter()
            .flat_map(|l| l.params.iter().map(|s| s.name.as_str()))
            .collect()
    }

    /// Rename every selection of the chart with a `_{index}` suffix, so that
    /// charts built with the same selection name can share a composition.
    fn suffix_selections(mut self, index: usize) -> Self {
        let names: Vec<String> = self.selection_names().into_iter().map(String::from).collect();
        for name in names {
            let to = format!("{name}_{index}");
            for layer in &mut self.layer {
                layer.rename_selection(&name, &to);
            }
        }
        self
    }

    /// Stack charts vertically.
    pub fn vconcat(charts: Vec<Chart>) -> Composition {
        Composition::VConcat {
            vconcat: Self::disambiguate(charts),
        }
    }

    /// Arrange charts side by side.
    pub fn hconcat(charts: Vec<Chart>) -> Composition {
        Composition::HConcat {
            hconcat: Self::disambiguate(charts),
        }
    }

    fn disambiguate(charts: Vec<Chart>) -> Vec<Chart> {
        charts
            .into_iter()
            .enumerate()
            .map(|(i, c)| c.suffix_selections(i))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Compositions and the top-level document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Composition {
    Single(Chart),
    VConcat { vconcat: Vec<Chart> },
    HConcat { hconcat: Vec<Chart> },
}

impl Composition {
    pub fn charts(&self) -> &[Chart] {
        match self {
            Composition::Single(c) => std::slice::from_ref(c),
            Composition::VConcat { vconcat } => vconcat,
            Composition::HConcat { hconcat } => hconcat,
        }
    }
}

impl From<Chart> for Composition {
    fn from(chart: Chart) -> Self {
        Composition::Single(chart)
    }
}

/// A complete Vega-Lite document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopLevel {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    #[serde(flatten)]
    pub spec: Composition,
}

impl TopLevel {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Composition> for TopLevel {
    fn from(spec: Composition) -> Self {
        Self {
            schema: SCHEMA,
            spec,
        }
    }
}

impl From<Chart> for TopLevel {
    fn from(chart: Chart) -> Self {
        Composition::Single(chart).into()
    }
}
