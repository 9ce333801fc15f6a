use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every input file must carry
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "shopping_mall",
    "category",
    "payment_method",
    "age",
    "price",
    "quantity",
    "gender",
];

/// Columns parsed as numbers; surrounding whitespace is ignored when typing them
const NUMERIC_COLUMNS: [&str; 3] = ["age", "price", "quantity"];

/// One transaction row, typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub shopping_mall: String,
    pub category: String,
    pub payment_method: String,
    pub age: u32,
    pub price: f64,
    pub quantity: u32,
    pub gender: String,
}

/// The immutable table loaded at startup.
///
/// `rows` keeps every column of the input exactly as read; `records[i]` is the
/// typed view of `rows[i]`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    records: Vec<Transaction>,
}

impl Dataset {
    /// Build a dataset from raw headers and rows, typing each row
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        check_required_columns(&headers)?;

        let header_record = csv::StringRecord::from(headers.clone());
        let numeric: Vec<bool> = headers
            .iter()
            .map(|h| NUMERIC_COLUMNS.contains(&h.as_str()))
            .collect();

        let mut records = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                anyhow::bail!(
                    "Row {} has {} fields, expected {}",
                    row_idx + 1,
                    row.len(),
                    headers.len()
                );
            }
            // Raw row stays untouched; only the typed copy trims numeric fields
            let record: csv::StringRecord = row
                .iter()
                .zip(&numeric)
                .map(|(field, &is_numeric)| if is_numeric { field.trim() } else { field.as_str() })
                .collect();
            let txn: Transaction = record
                .deserialize(Some(&header_record))
                .with_context(|| format!("Failed to parse transaction at row {}", row_idx + 1))?;
            records.push(txn);
        }

        Ok(Self {
            headers,
            rows,
            records,
        })
    }

    /// Load a CSV file from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset '{}'", path.display()))?;
        let dataset = Self::from_reader(file)
            .with_context(|| format!("Failed to load dataset '{}'", path.display()))?;
        log::info!(
            "loaded {} transactions from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Load CSV from any reader (header row required)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, result) in rdr.records().enumerate() {
            let record =
                result.with_context(|| format!("Failed to read CSV row {}", row_idx + 1))?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        Self::new(headers, rows)
    }

    /// Create a Dataset from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            return Ok(Self {
                headers: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                ..Self::default()
            });
        }

        let objects = array
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| anyhow!("Items in array must be objects"))
            })
            .collect::<Result<Vec<_>>>()?;

        // Headers in source key order; keys first seen in later objects are appended
        let mut headers: Vec<String> = Vec::new();
        for obj in &objects {
            for key in obj.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(objects.len());
        for obj in objects {
            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// Raw fields of row `idx`, in header order
    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values of a column, in order of first appearance
    pub fn distinct(&self, column: &str) -> Result<Vec<String>> {
        let idx = find_col_index(&self.headers, column)?;
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in &self.rows {
            let value = &row[idx];
            if seen.insert(value.as_str()) {
                values.push(value.clone());
            }
        }
        Ok(values)
    }
}

fn check_required_columns(headers: &[String]) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        find_col_index(headers, column)?;
    }
    Ok(())
}

fn find_col_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| anyhow!("Column '{}' not found", name))
}
