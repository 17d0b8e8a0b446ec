//! Primary-then-fallback run store combinator
//!
//! The hosted deployment keeps run history in a remote table service and
//! mirrors it to local storage so the tools keep working offline. This
//! combinator expresses that pattern once, at construction time, instead
//! of scattering availability checks through the business logic: reads try
//! the primary and fall back to the secondary; writes go to the primary
//! and are mirrored to the secondary, or land on the secondary alone when
//! the primary is down.

use async_trait::async_trait;
use uuid::Uuid;

use crate::traits::{RunQuery, RunStore};
use crate::types::*;

/// A [`RunStore`] that prefers `primary` and degrades to `secondary`
pub struct FallbackRunStore<P: RunStore, S: RunStore> {
    primary: P,
    secondary: S,
}

impl<P: RunStore, S: RunStore> FallbackRunStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// Access the secondary store, e.g. to inspect what was mirrored
    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

#[async_trait]
impl<P: RunStore, S: RunStore> RunStore for FallbackRunStore<P, S> {
    async fn save_run(&mut self, run: &ReconciliationRun) -> ReconResult<()> {
        match self.primary.save_run(run).await {
            Ok(()) => {
                // Mirror so reads still work when the primary goes away.
                // A failed mirror is not fatal: the primary has the data.
                let _ = self.secondary.save_run(run).await;
                Ok(())
            }
            Err(_) => self.secondary.save_run(run).await,
        }
    }

    async fn get_run(&self, id: Uuid) -> ReconResult<Option<ReconciliationRun>> {
        match self.primary.get_run(id).await {
            Ok(Some(run)) => Ok(Some(run)),
            Ok(None) | Err(_) => self.secondary.get_run(id).await,
        }
    }

    async fn list_runs(&self, query: &RunQuery) -> ReconResult<Vec<ReconciliationRun>> {
        match self.primary.list_runs(query).await {
            Ok(runs) => Ok(runs),
            Err(_) => self.secondary.list_runs(query).await,
        }
    }

    async fn update_run(&mut self, run: &ReconciliationRun) -> ReconResult<()> {
        match self.primary.update_run(run).await {
            Ok(()) => {
                let _ = self.secondary.update_run(run).await;
                Ok(())
            }
            Err(ReconError::Storage(_)) => self.secondary.update_run(run).await,
            Err(ReconError::RunNotFound(_)) => {
                // The primary may simply have never seen this run
                if self.secondary.get_run(run.id).await?.is_some() {
                    self.secondary.update_run(run).await
                } else {
                    Err(ReconError::RunNotFound(run.id))
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_run(&mut self, id: Uuid) -> ReconResult<()> {
        let primary = self.primary.delete_run(id).await;
        let secondary = self.secondary.delete_run(id).await;
        // Deleting succeeds if either copy was removed
        match (primary, secondary) {
            (Ok(()), _) | (_, Ok(())) => Ok(()),
            (Err(e), Err(_)) => Err(e),
        }
    }
}
