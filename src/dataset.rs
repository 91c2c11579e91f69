use crate::error::ChartError;
use serde::Serialize;

/// One tool's measurements across all categories, aligned by index with the
/// category list. `None` means no measurement exists for that combination;
/// it is valid data, distinct from a measured zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// A series with a measurement for every category.
    pub fn complete(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// Number of present (measured) values.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// An ordered set of series sharing one category list. Category order is
/// significant: it fixes each category's vertical slot in every chart drawn
/// from this dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    categories: Vec<String>,
    series: Vec<Series>,
}

impl Dataset {
    /// Build a dataset, checking that every series has exactly one value
    /// (present or absent) per category.
    pub fn new(categories: Vec<String>, series: Vec<Series>) -> Result<Self, ChartError> {
        if categories.is_empty() {
            return Err(ChartError::Configuration(
                "dataset needs at least one category".to_string(),
            ));
        }
        if series.is_empty() {
            return Err(ChartError::Configuration(
                "dataset needs at least one series".to_string(),
            ));
        }
        for s in &series {
            if s.values.len() != categories.len() {
                return Err(ChartError::Configuration(format!(
                    "series '{}' has {} values for {} categories",
                    s.name,
                    s.values.len(),
                    categories.len()
                )));
            }
        }
        Ok(Self { categories, series })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Total number of bars this dataset produces (absent values excluded).
    pub fn bar_count(&self) -> usize {
        self.series.iter().map(Series::present_count).sum()
    }

    /// Largest present value, or 0.0 when nothing is measured.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(0.0_f64, |a, &b| a.max(b))
    }
}
