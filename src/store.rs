//! Dataset snapshot store.
//!
//! The host keys datasets by an opaque identifier (session token, upload
//! id) and injects this store into its request handlers; the core holds no
//! global state. Each entry keeps the original table plus the current
//! filtered derivative, so at most two full copies exist per dataset. A
//! new filter result replaces the derivative rather than composing with
//! it. Lifecycle (creation on load, replacement on filter, eviction) is
//! owned by the host.

use std::collections::HashMap;

use polars::prelude::DataFrame;

/// One stored dataset: source name, original table, current filtered view.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub source_name: String,
    pub original: DataFrame,
    pub filtered: DataFrame,
}

impl DatasetSnapshot {
    /// A fresh snapshot starts with the filtered view equal to the
    /// original (an unfiltered dashboard shows the whole table).
    pub fn new(source_name: impl Into<String>, table: DataFrame) -> Self {
        Self {
            source_name: source_name.into(),
            filtered: table.clone(),
            original: table,
        }
    }
}

/// Keyed collection of dataset snapshots.
#[derive(Debug, Default)]
pub struct DatasetStore {
    datasets: HashMap<String, DatasetSnapshot>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly loaded table under `id`, replacing any previous
    /// dataset stored with that id.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        source_name: impl Into<String>,
        table: DataFrame,
    ) {
        self.datasets
            .insert(id.into(), DatasetSnapshot::new(source_name, table));
    }

    pub fn get(&self, id: &str) -> Option<&DatasetSnapshot> {
        self.datasets.get(id)
    }

    /// Replace the current filtered derivative for `id`. Returns false
    /// when the id is unknown; the caller decides whether that is a stale
    /// session or a bug.
    pub fn replace_filtered(&mut self, id: &str, filtered: DataFrame) -> bool {
        match self.datasets.get_mut(id) {
            Some(entry) => {
                entry.filtered = filtered;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<DatasetSnapshot> {
        self.datasets.remove(id)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
