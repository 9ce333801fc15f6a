use crate::filter::{FilterParams, FilteredSet};
use serde::Serialize;
use std::fmt;

pub const DASHBOARD_TITLE: &str = "Sales Analysis";

/// Scalar summaries of the filtered set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub transactions: usize,
    pub total_sales: f64,
}

impl Summary {
    pub fn from_filtered(filtered: &FilteredSet) -> Self {
        Self {
            transactions: filtered.len(),
            total_sales: filtered.records().map(|txn| txn.price).sum(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of transactions: {}", self.transactions)?;
        write!(f, "Total sales: {:.2}", self.total_sales)
    }
}

/// Sentence describing the active selection
pub fn caption(params: &FilterParams) -> String {
    format!(
        "Showing data for {} shopping mall, {} category, and {} payment method(s): {}",
        params.mall.as_deref().unwrap_or(""),
        params.category.as_deref().unwrap_or(""),
        params.payment_methods.len(),
        params.payment_methods.join(", ")
    )
}
