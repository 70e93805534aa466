//! Application service: the instance roster and its liveness probes.
//!
//! Every refresh discards the previous view, re-fetches the full list and
//! spawns one independent probe task per row, keyed by row position.
//! Probes from an earlier refresh are aborted so they can never write into
//! the new view.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::ports::{ProvisioningApi, RosterRefresh, RosterView};
use crate::domain::roster::{Liveness, RosterEntry, build_roster};

/// Message shown in place of the list when it cannot be fetched.
pub const ROSTER_UNAVAILABLE: &str = "could not load the instance list";

pub struct InstanceRoster<A, V> {
    api: Arc<A>,
    view: Arc<V>,
    domain_suffix: String,
    probes: Mutex<HashMap<usize, JoinHandle<()>>>,
}

impl<A, V> InstanceRoster<A, V>
where
    A: ProvisioningApi + 'static,
    V: RosterView + 'static,
{
    #[must_use]
    pub fn new(api: Arc<A>, view: Arc<V>, domain_suffix: impl Into<String>) -> Self {
        Self {
            api,
            view,
            domain_suffix: domain_suffix.into(),
            probes: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the list, replace the view and start one probe per row.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance list cannot be fetched. Outstanding
    /// probes are aborted either way.
    pub async fn reload(&self) -> Result<Vec<RosterEntry>> {
        self.cancel_probes();
        let records = self.api.instances().await?;
        let rows = build_roster(records, &self.domain_suffix);
        debug!(count = rows.len(), "roster fetched");
        if rows.is_empty() {
            self.view.render_empty();
            return Ok(rows);
        }
        self.view.render(&rows);

        let mut probes = self.probes();
        for (index, row) in rows.iter().enumerate() {
            let api = Arc::clone(&self.api);
            let view = Arc::clone(&self.view);
            let prefix = row.prefix.clone();
            let handle = tokio::spawn(async move {
                let liveness = probe(api.as_ref(), &prefix).await;
                view.update_liveness(index, liveness);
            });
            probes.insert(index, handle);
        }
        Ok(rows)
    }

    /// Abort every outstanding probe. Rows they would have updated stay
    /// as they are.
    pub fn cancel_probes(&self) {
        for (_, handle) in self.probes().drain() {
            handle.abort();
        }
    }

    /// Number of probes that have not settled yet.
    #[must_use]
    pub fn pending_probes(&self) -> usize {
        self.probes().values().filter(|h| !h.is_finished()).count()
    }

    /// Wait until every probe of the current refresh has settled.
    pub async fn settle(&self) {
        let handles: Vec<_> = self.probes().drain().map(|(_, h)| h).collect();
        for result in join_all(handles).await {
            match result {
                Err(e) if !e.is_cancelled() => warn!(error = %e, "liveness probe task failed"),
                _ => {}
            }
        }
    }

    fn probes(&self) -> MutexGuard<'_, HashMap<usize, JoinHandle<()>>> {
        self.probes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A, V> Drop for InstanceRoster<A, V> {
    fn drop(&mut self) {
        let probes = self.probes.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, handle) in probes.drain() {
            handle.abort();
        }
    }
}

impl<A, V> RosterRefresh for InstanceRoster<A, V>
where
    A: ProvisioningApi + 'static,
    V: RosterView + 'static,
{
    async fn refresh(&self) {
        if let Err(e) = self.reload().await {
            warn!(error = format!("{e:#}"), "instance list request failed");
            self.view.render_error(ROSTER_UNAVAILABLE);
        }
    }
}

/// One-shot liveness check. A failed request settles as [`Liveness::Error`].
pub async fn probe(api: &impl ProvisioningApi, prefix: &str) -> Liveness {
    match api.ping(prefix).await {
        Ok(response) => Liveness::from_probe(Some(response.reachable)),
        Err(e) => {
            debug!(prefix, error = format!("{e:#}"), "liveness probe failed");
            Liveness::from_probe(None)
        }
    }
}
