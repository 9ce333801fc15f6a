use crate::data::{Dataset, Transaction};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Lower limit of the age slider
pub const AGE_MIN: u32 = 18;
/// Upper limit of the age slider
pub const AGE_MAX: u32 = 80;

/// Inclusive age interval, always within [AGE_MIN, AGE_MAX]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct AgeRange {
    lower: u32,
    upper: u32,
}

impl AgeRange {
    pub fn new(lower: u32, upper: u32) -> Result<Self> {
        if lower > upper {
            anyhow::bail!("Age range lower bound {} exceeds upper bound {}", lower, upper);
        }
        if lower < AGE_MIN || upper > AGE_MAX {
            anyhow::bail!(
                "Age range [{}, {}] outside slider limits [{}, {}]",
                lower,
                upper,
                AGE_MIN,
                AGE_MAX
            );
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> u32 {
        self.lower
    }

    pub fn upper(&self) -> u32 {
        self.upper
    }

    pub fn contains(&self, age: u32) -> bool {
        self.lower <= age && age <= self.upper
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            lower: AGE_MIN,
            upper: AGE_MAX,
        }
    }
}

impl TryFrom<(u32, u32)> for AgeRange {
    type Error = anyhow::Error;

    fn try_from((lower, upper): (u32, u32)) -> Result<Self> {
        Self::new(lower, upper)
    }
}

impl From<AgeRange> for (u32, u32) {
    fn from(range: AgeRange) -> Self {
        (range.lower, range.upper)
    }
}

/// Current values of the filtering widgets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub mall: Option<String>,
    pub category: Option<String>,
    pub payment_methods: Vec<String>,
    pub age_range: AgeRange,
}

impl FilterParams {
    pub fn new(
        mall: impl Into<String>,
        category: impl Into<String>,
        payment_methods: impl IntoIterator<Item = impl Into<String>>,
        age_range: AgeRange,
    ) -> Self {
        let mut params = Self {
            mall: Some(mall.into()),
            category: Some(category.into()),
            payment_methods: Vec::new(),
            age_range,
        };
        for method in payment_methods {
            params.select_payment_method(method);
        }
        params
    }

    /// Add a payment method to the selection, keeping selection order
    pub fn select_payment_method(&mut self, method: impl Into<String>) {
        let method = method.into();
        if self.payment_methods.contains(&method) {
            log::warn!("payment method '{}' selected twice; ignoring", method);
            return;
        }
        self.payment_methods.push(method);
    }

    /// Whether a single record passes all four predicates
    pub fn matches(&self, txn: &Transaction) -> bool {
        let (Some(mall), Some(category)) = (&self.mall, &self.category) else {
            return false;
        };
        txn.shopping_mall == *mall
            && txn.category == *category
            && self.payment_methods.iter().any(|m| *m == txn.payment_method)
            && self.age_range.contains(txn.age)
    }
}

/// Borrowed view of the rows that passed the current filters
#[derive(Debug, Clone)]
pub struct FilteredSet<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredSet<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Original row indices, ascending
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Apply the filter predicate to every record of the dataset
pub fn apply_filters<'a>(dataset: &'a Dataset, params: &FilterParams) -> FilteredSet<'a> {
    // Empty multiselect short-circuits: nothing can match
    let indices = if params.payment_methods.is_empty() {
        Vec::new()
    } else {
        dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, txn)| params.matches(txn))
            .map(|(idx, _)| idx)
            .collect()
    };

    log::debug!("filter kept {} of {} records", indices.len(), dataset.len());

    FilteredSet { dataset, indices }
}
