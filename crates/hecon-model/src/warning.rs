//! Cell-level coercion warnings.
//!
//! A failed coercion never aborts a batch: the cell becomes null and the
//! failure is counted here per source column.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseWarningKind {
    /// The cell could not be parsed as the expected type.
    Unparseable,
    /// The cell parsed but fell outside the accepted range.
    OutOfRange,
}

/// Per-column counts of recovered parse failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnWarnings {
    pub unparseable: usize,
    pub out_of_range: usize,
}

impl ColumnWarnings {
    pub fn total(&self) -> usize {
        self.unparseable + self.out_of_range
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParseWarnings {
    by_column: BTreeMap<String, ColumnWarnings>,
}

impl ParseWarnings {
    pub fn record(&mut self, column: &str, kind: ParseWarningKind) {
        let entry = self.by_column.entry(column.to_string()).or_default();
        match kind {
            ParseWarningKind::Unparseable => entry.unparseable += 1,
            ParseWarningKind::OutOfRange => entry.out_of_range += 1,
        }
    }

    pub fn for_column(&self, column: &str) -> ColumnWarnings {
        self.by_column.get(column).copied().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.by_column.values().map(ColumnWarnings::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnWarnings)> {
        self.by_column.iter().map(|(column, counts)| (column.as_str(), counts))
    }
}
