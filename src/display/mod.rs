//! Adaptive display engine for ticket form submissions.
//!
//! The pipeline runs leaves-first: [`field_type`] classifies scalars,
//! [`format`] renders them, [`classify`] recognises the submission's archetype
//! and [`builder`] assembles a [`model::DisplayModel`]. [`DisplayEngine`] ties
//! the stages to one configuration and one set of bounded caches.

pub mod builder;
pub mod cache;
pub mod classify;
pub mod field_type;
pub mod format;
pub mod model;

use crate::config::DisplayConfig;
use crate::currency::CurrencyFormatter;
use crate::form::{FormSubmission, Row, Scalar};

use cache::{CacheStats, DisplayCaches, FieldTypeKey};
use classify::FormStructure;
use format::CellFormatter;
use model::{ColumnDescriptor, FieldType};

/// Entry point for building and formatting displays.
///
/// All operations take `&self`; an engine can be shared between threads and
/// reused for every ticket. Call [`DisplayEngine::clear_caches`] when a view is
/// torn down to release memoised entries early.
#[derive(Debug)]
pub struct DisplayEngine {
    config: DisplayConfig,
    formatter: CellFormatter,
    caches: DisplayCaches,
}

impl DisplayEngine {
    pub fn new(config: DisplayConfig) -> Self {
        let currency = CurrencyFormatter::new(
            config.currency_symbol.clone(),
            config.passthrough_markers.clone(),
            config.locale.clone(),
        );
        Self {
            formatter: CellFormatter::new(currency),
            caches: DisplayCaches::new(config.cache_capacity),
            config,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn formatter(&self) -> &CellFormatter {
        &self.formatter
    }

    /// Memoised [`field_type::detect_type`].
    pub fn detect_type(&self, value: &Scalar, field_name: Option<&str>) -> FieldType {
        if value.is_null() {
            return FieldType::Text;
        }
        let key = FieldTypeKey::new(value.kind(), &value.to_text(), field_name);
        if let Some(hit) = self.caches.field_type(&key) {
            tracing::trace!(field = field_name.unwrap_or_default(), "field type cache hit");
            return hit;
        }
        let detected = field_type::detect_type(value, field_name);
        self.caches.store_field_type(key, detected);
        detected
    }

    /// Memoised [`format::format_field_name`].
    pub fn format_field_name(&self, field_name: &str) -> String {
        if let Some(hit) = self.caches.formatted_name(field_name) {
            return hit;
        }
        let label = format::format_field_name(field_name);
        self.caches
            .store_formatted_name(field_name.to_string(), label.clone());
        label
    }

    /// Column layout for a table, inferred from the keys and values of its
    /// first row.
    pub fn columns_for_row(&self, row: &Row) -> Vec<ColumnDescriptor> {
        let typed: Vec<(&str, FieldType)> = row
            .cells()
            .iter()
            .map(|(key, value)| (key.as_str(), self.detect_type(value, Some(key))))
            .collect();
        let signature = typed
            .iter()
            .map(|(key, field_type)| format!("{}:{}", key, field_type.as_str()))
            .collect::<Vec<_>>()
            .join("|");

        if let Some(hit) = self.caches.columns(&signature) {
            return hit;
        }
        let columns: Vec<ColumnDescriptor> = typed
            .into_iter()
            .map(|(key, field_type)| ColumnDescriptor {
                key: key.to_string(),
                label: self.format_field_name(key),
                field_type,
            })
            .collect();
        self.caches.store_columns(signature, columns.clone());
        columns
    }

    pub fn format_cell(&self, value: &Scalar, field_type: FieldType) -> String {
        self.formatter.format_cell(value, field_type)
    }

    pub fn format_currency(&self, value: &Scalar) -> String {
        self.formatter.format_currency(value)
    }

    pub fn sum_column(&self, rows: &[Row], key: &str) -> String {
        self.formatter.sum_column(rows, key)
    }

    pub fn classify(&self, form: &FormSubmission) -> FormStructure {
        classify::classify(form)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.caches.stats()
    }

    pub fn clear_caches(&self) {
        self.caches.clear();
    }
}

impl Default for DisplayEngine {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}
