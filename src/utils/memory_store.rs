//! In-memory run store for testing and local fallback

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::{RunQuery, RunStore};
use crate::types::*;

/// In-memory [`RunStore`] implementation
///
/// Plays the role the browser-local key-value cache plays in the hosted
/// deployment: cheap, always available, scoped to the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryRunStore {
    runs: Arc<RwLock<HashMap<Uuid, ReconciliationRun>>>,
}

impl MemoryRunStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.runs.write().unwrap().clear();
    }

    /// Number of stored runs
    pub fn len(&self) -> usize {
        self.runs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RunStore for MemoryRunStore {
    async fn save_run(&mut self, run: &ReconciliationRun) -> ReconResult<()> {
        self.runs.write().unwrap().insert(run.id, run.clone());
        Ok(())
    }

    async fn get_run(&self, id: Uuid) -> ReconResult<Option<ReconciliationRun>> {
        Ok(self.runs.read().unwrap().get(&id).cloned())
    }

    async fn list_runs(&self, query: &RunQuery) -> ReconResult<Vec<ReconciliationRun>> {
        let runs = self.runs.read().unwrap();
        let mut filtered: Vec<ReconciliationRun> =
            runs.values().filter(|r| query.accepts(r)).cloned().collect();
        // Newest first; id as a stable tie-break for equal timestamps
        filtered.sort_by(|a, b| {
            b.executed_at
                .cmp(&a.executed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(filtered)
    }

    async fn update_run(&mut self, run: &ReconciliationRun) -> ReconResult<()> {
        if self.runs.read().unwrap().contains_key(&run.id) {
            self.runs.write().unwrap().insert(run.id, run.clone());
            Ok(())
        } else {
            Err(ReconError::RunNotFound(run.id))
        }
    }

    async fn delete_run(&mut self, id: Uuid) -> ReconResult<()> {
        if self.runs.write().unwrap().remove(&id).is_some() {
            Ok(())
        } else {
            Err(ReconError::RunNotFound(id))
        }
    }
}
