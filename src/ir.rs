use serde::Serialize;

// =============================================================================
// Chart descriptions
// =============================================================================
//
// Back-end independent charts built from a filtered set. `vegalite` serialises
// them as declarative specs, `graph` rasterises them.

/// One field shown in a hover tooltip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipField {
    pub field: String,
    pub value: String,
}

impl TooltipField {
    pub fn new(field: impl Into<String>, value: impl ToString) -> Self {
        Self {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// A single entry of a discrete color scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMapping {
    pub label: String,
    pub color: String,
}

/// Age vs. price, one point per transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
    pub color_scale: Vec<ColorMapping>,
    /// Pan/zoom enabled
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Legend key (the gender label)
    pub series: String,
    pub color: String,
    pub tooltip: Vec<TooltipField>,
}

/// Sales per payment method, sorted descending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub category: String,
    pub value: f64,
    pub color: String,
    pub tooltip: Vec<TooltipField>,
}

impl ScatterChart {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl BarChart {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
