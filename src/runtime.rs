// Dashboard pipeline: widget values in, view model out

use crate::data::Dataset;
use crate::filter::{apply_filters, AgeRange, FilterParams, AGE_MAX, AGE_MIN};
use crate::ir::{BarChart, ScatterChart};
use crate::summary::{self, Summary, DASHBOARD_TITLE};
use crate::table::TableView;
use crate::transform;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// Values of every widget on the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetState {
    pub mall: Option<String>,
    pub category: Option<String>,
    pub payment_methods: Vec<String>,
    pub age_range: AgeRange,
    pub show_table: bool,
    pub show_scatter: bool,
    pub show_bar: bool,
}

impl WidgetState {
    pub fn filter_params(&self) -> FilterParams {
        let mut params = FilterParams {
            mall: self.mall.clone(),
            category: self.category.clone(),
            payment_methods: Vec::with_capacity(self.payment_methods.len()),
            age_range: self.age_range,
        };
        for method in &self.payment_methods {
            params.select_payment_method(method.as_str());
        }
        params
    }
}

/// Options offered by the selectors, derived from the loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controls {
    pub malls: Vec<String>,
    pub categories: Vec<String>,
    pub payment_methods: Vec<String>,
    pub age_bounds: (u32, u32),
}

impl Controls {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        Ok(Self {
            malls: dataset.distinct("shopping_mall")?,
            categories: dataset.distinct("category")?,
            payment_methods: dataset.distinct("payment_method")?,
            age_bounds: (AGE_MIN, AGE_MAX),
        })
    }

    /// State before any interaction: first option of each single select,
    /// nothing in the multiselect, full age range, toggles off
    pub fn default_state(&self) -> WidgetState {
        WidgetState {
            mall: self.malls.first().cloned(),
            category: self.categories.first().cloned(),
            ..WidgetState::default()
        }
    }

    /// Single selects always hold a value once options exist
    pub fn fill_selections(&self, state: &mut WidgetState) {
        if state.mall.is_none() {
            state.mall = self.malls.first().cloned();
        }
        if state.category.is_none() {
            state.category = self.categories.first().cloned();
        }
    }
}

/// Everything the page shows for one widget state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub title: String,
    pub caption: String,
    pub summary: Summary,
    pub scatter: Option<ScatterChart>,
    pub bar: Option<BarChart>,
    pub table: Option<TableView>,
}

/// Recompute the whole page from the dataset and the current widget values
pub fn render(dataset: &Dataset, state: &WidgetState) -> ViewModel {
    let params = state.filter_params();
    let filtered = apply_filters(dataset, &params);

    let view = ViewModel {
        title: DASHBOARD_TITLE.to_string(),
        caption: summary::caption(&params),
        summary: Summary::from_filtered(&filtered),
        scatter: state
            .show_scatter
            .then(|| transform::build_scatter(&filtered)),
        bar: state.show_bar.then(|| transform::build_bar(&filtered)),
        table: state
            .show_table
            .then(|| TableView::from_filtered(&filtered)),
    };

    log::debug!(
        "rendered view: {} transactions, scatter={}, bar={}, table={}",
        view.summary.transactions,
        view.scatter.is_some(),
        view.bar.is_some(),
        view.table.is_some()
    );

    view
}

/// Answer one JSON widget state per input line with one JSON view model per
/// output line, strictly in order. A line that is not valid UTF-8 or not a
/// valid state gets an `{"error": ...}` reply and the loop goes on.
pub fn serve<R: BufRead, W: Write>(
    dataset: &Dataset,
    controls: &Controls,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("Failed to read stdin")?;
        if read == 0 {
            break;
        }

        let reply = match reply_to(dataset, controls, &buf) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("rejected widget state: {}", e);
                Some(serde_json::json!({ "error": format!("{:#}", e) }).to_string())
            }
        };
        let Some(reply) = reply else { continue };

        writeln!(output, "{}", reply)?;
        output.flush().context("Failed to flush stdout")?;
    }

    Ok(())
}

/// `None` for a blank line
fn reply_to(dataset: &Dataset, controls: &Controls, line: &[u8]) -> Result<Option<String>> {
    let line = std::str::from_utf8(line).context("Input line is not valid UTF-8")?;
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut state: WidgetState = serde_json::from_str(line)?;
    controls.fill_selections(&mut state);
    let view = serde_json::to_string(&render(dataset, &state))?;
    Ok(Some(view))
}
