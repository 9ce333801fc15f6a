use crate::filter::FilteredSet;
use crate::ir::{Bar, BarChart, ColorMapping, ScatterChart, ScatterPoint, TooltipField};
use crate::palette::{self, GENDER_SCALE};
use std::collections::HashMap;

pub const SCATTER_TITLE: &str = "Age vs. Price";
pub const BAR_TITLE: &str = "Sales by Payment Method";

/// Build the age/price scatter chart: one point per filtered record
pub fn build_scatter(filtered: &FilteredSet) -> ScatterChart {
    let points = filtered
        .records()
        .map(|txn| ScatterPoint {
            x: f64::from(txn.age),
            y: txn.price,
            size: f64::from(txn.quantity),
            series: txn.gender.clone(),
            color: palette::gender_color(&txn.gender).to_string(),
            tooltip: vec![
                TooltipField::new("age", txn.age),
                TooltipField::new("price", txn.price),
            ],
        })
        .collect();

    ScatterChart {
        title: SCATTER_TITLE.to_string(),
        x_label: "age".to_string(),
        y_label: "price".to_string(),
        points,
        color_scale: GENDER_SCALE
            .iter()
            .map(|(label, color)| ColorMapping {
                label: label.to_string(),
                color: color.to_string(),
            })
            .collect(),
        interactive: true,
    }
}

/// Build the payment-method bar chart: summed price per method, descending
pub fn build_bar(filtered: &FilteredSet) -> BarChart {
    let (methods, totals) = sum_by_payment_method(filtered);

    // Set1 is assigned over the methods present, in alphabetical order
    let mut sorted_methods: Vec<&String> = methods.iter().collect();
    sorted_methods.sort();
    let color_of = |method: &str| {
        let idx = sorted_methods
            .iter()
            .position(|m| m.as_str() == method)
            .unwrap_or(0);
        palette::set1_color(idx).to_string()
    };

    let mut bars: Vec<Bar> = methods
        .iter()
        .zip(totals.iter())
        .map(|(method, &total)| Bar {
            category: method.clone(),
            value: total,
            color: color_of(method),
            tooltip: vec![
                TooltipField::new("payment_method", method),
                TooltipField::new("sum(price)", total),
            ],
        })
        .collect();

    // Stable sort: ties keep first-appearance order
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));

    BarChart {
        title: BAR_TITLE.to_string(),
        x_label: "payment_method".to_string(),
        y_label: "Total Sales".to_string(),
        bars,
        interactive: true,
    }
}

/// Sum price per payment method.
/// Returns (methods, totals) in order of first appearance.
fn sum_by_payment_method(filtered: &FilteredSet) -> (Vec<String>, Vec<f64>) {
    let mut method_totals: HashMap<&str, f64> = HashMap::new();
    let mut methods_order: Vec<String> = Vec::new();

    for txn in filtered.records() {
        let method = txn.payment_method.as_str();
        if !method_totals.contains_key(method) {
            methods_order.push(method.to_string());
        }
        *method_totals.entry(method).or_insert(0.0) += txn.price;
    }

    let totals = methods_order
        .iter()
        .map(|m| method_totals.get(m.as_str()).copied().unwrap_or(0.0))
        .collect();

    (methods_order, totals)
}
