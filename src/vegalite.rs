//! Vega-Lite v5 specifications for the dashboard charts.
//!
//! The emitted specs embed their data inline and bind an interval selection to
//! the scales, which gives the pan/zoom behaviour; tooltips come from the
//! encoding.

use crate::ir::{BarChart, ScatterChart};
use serde_json::{json, Value};

pub const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

fn pan_zoom_params(interactive: bool) -> Value {
    if interactive {
        json!([{ "name": "grid", "select": "interval", "bind": "scales" }])
    } else {
        json!([])
    }
}

/// Scatter: age on x, price on y, size by quantity, color by gender
pub fn scatter_spec(chart: &ScatterChart) -> Value {
    let values: Vec<Value> = chart
        .points
        .iter()
        .map(|p| {
            json!({
                "age": p.x,
                "price": p.y,
                "quantity": p.size,
                "gender": p.series
            })
        })
        .collect();

    let (domain, range): (Vec<&str>, Vec<&str>) = chart
        .color_scale
        .iter()
        .map(|m| (m.label.as_str(), m.color.as_str()))
        .unzip();

    json!({
        "$schema": SCHEMA,
        "title": chart.title,
        "width": "container",
        "data": { "values": values },
        "mark": "circle",
        "params": pan_zoom_params(chart.interactive),
        "encoding": {
            "x": { "field": "age", "type": "quantitative", "title": chart.x_label },
            "y": { "field": "price", "type": "quantitative", "title": chart.y_label },
            "size": { "field": "quantity", "type": "quantitative" },
            "color": {
                "field": "gender",
                "type": "nominal",
                "scale": { "domain": domain, "range": range }
            },
            "tooltip": [
                { "field": "age", "type": "quantitative" },
                { "field": "price", "type": "quantitative" }
            ]
        }
    })
}

/// Bar: pre-aggregated totals per payment method, sorted descending
pub fn bar_spec(chart: &BarChart) -> Value {
    let values: Vec<Value> = chart
        .bars
        .iter()
        .map(|b| json!({ "payment_method": b.category, "total_sales": b.value }))
        .collect();

    let (domain, range): (Vec<&str>, Vec<&str>) = chart
        .bars
        .iter()
        .map(|b| (b.category.as_str(), b.color.as_str()))
        .unzip();

    json!({
        "$schema": SCHEMA,
        "title": chart.title,
        "width": "container",
        "data": { "values": values },
        "mark": "bar",
        "params": pan_zoom_params(chart.interactive),
        "encoding": {
            "x": {
                "field": "payment_method",
                "type": "nominal",
                "sort": "-y",
                "title": chart.x_label
            },
            "y": {
                "field": "total_sales",
                "type": "quantitative",
                "axis": { "title": chart.y_label }
            },
            "color": {
                "field": "payment_method",
                "type": "nominal",
                "scale": { "domain": domain, "range": range }
            },
            "tooltip": [
                { "field": "payment_method", "type": "nominal" },
                { "field": "total_sales", "type": "quantitative", "title": "sum(price)" }
            ]
        }
    })
}
