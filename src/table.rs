use crate::filter::FilteredSet;
use serde::Serialize;
use std::fmt;

/// The filtered rows, exactly as they appeared in the input file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    /// Original row index of each row
    pub index: Vec<usize>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_filtered(filtered: &FilteredSet) -> Self {
        let dataset = filtered.dataset();
        let rows = filtered
            .indices()
            .iter()
            .filter_map(|&idx| dataset.row(idx).map(<[String]>::to_vec))
            .collect();

        Self {
            headers: dataset.headers().to_vec(),
            index: filtered.indices().to_vec(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for TableView {
    /// Aligned plain-text grid; the leading unnamed column is the row index
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_labels: Vec<String> = self.index.iter().map(|i| i.to_string()).collect();
        let index_width = index_labels.iter().map(|s| s.chars().count()).max().unwrap_or(0);

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write!(f, "{:index_width$}", "")?;
        for (header, width) in self.headers.iter().zip(&widths) {
            write!(f, "  {:<width$}", header, width = *width)?;
        }

        for (label, row) in index_labels.iter().zip(&self.rows) {
            writeln!(f)?;
            write!(f, "{:>index_width$}", label)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:<width$}", cell, width = *width)?;
            }
        }
        Ok(())
    }
}
