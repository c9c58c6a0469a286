// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! List-then-watch loop feeding DummySites to the reconciler one at a time.

use crate::config::BackoffConfig;
use crate::reconcilers::Reconcile;
use crate::types::DummySite;
use crate::watch::backoff::Backoff;
use crate::watch::source::{SiteEvent, SiteSource};
use futures::StreamExt;
use kube::ResourceExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Where the watch loop currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchState {
    /// Enumerate and reconcile every DummySite
    Listing,
    /// Follow changes after the given resourceVersion
    Watching { resource_version: String },
    /// Wait before listing again
    Backoff,
}

/// Drives reconciliation from DummySite events.
///
/// Every list or watch failure goes through [`WatchState::Backoff`] and then a full
/// re-list, so sites changed while disconnected are still reconciled.
pub struct WatchLoop<S, R> {
    source: S,
    reconciler: R,
    backoff: Backoff,
}

impl<S: SiteSource, R: Reconcile> WatchLoop<S, R> {
    pub fn new(source: S, reconciler: R, backoff: BackoffConfig) -> Self {
        Self {
            source,
            reconciler,
            backoff: Backoff::new(backoff),
        }
    }

    /// Run until the process exits.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Watch loop started");

        let mut state = WatchState::Listing;
        loop {
            state = self.step(state).await;
        }
    }

    /// Perform one transition of the state machine.
    pub async fn step(&mut self, state: WatchState) -> WatchState {
        match state {
            WatchState::Listing => self.resync().await,
            WatchState::Watching { resource_version } => self.watch(resource_version).await,
            WatchState::Backoff => {
                let delay = self.backoff.next_delay();
                warn!(
                    "Retrying in {:?} (consecutive failures: {})",
                    delay,
                    self.backoff.failures()
                );
                sleep(delay).await;
                WatchState::Listing
            }
        }
    }

    async fn resync(&self) -> WatchState {
        let list = match self.source.list().await {
            Ok(list) => list,
            Err(e) => {
                error!("Failed to list DummySites: {}", e);
                return WatchState::Backoff;
            }
        };

        info!("Resyncing {} DummySites", list.items.len());
        for site in &list.items {
            self.reconcile(site).await;
        }

        WatchState::Watching {
            resource_version: list.resource_version,
        }
    }

    async fn watch(&mut self, mut resource_version: String) -> WatchState {
        let mut stream = match self.source.watch(&resource_version).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to start DummySite watch: {}", e);
                return WatchState::Backoff;
            }
        };
        debug!("Watching DummySites from resourceVersion {}", resource_version);

        while let Some(event) = stream.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    warn!("DummySite watch failed: {}", e);
                    return WatchState::Backoff;
                }
            };
            // Any delivered event ends the current failure streak.
            self.backoff.reset();

            match event {
                SiteEvent::Added(site) | SiteEvent::Modified(site) => {
                    if let Some(version) = site.resource_version() {
                        resource_version = version;
                    }
                    self.reconcile(&site).await;
                }
                SiteEvent::Deleted(site) => {
                    debug!("DummySite {} deleted", site.key());
                    if let Some(version) = site.resource_version() {
                        resource_version = version;
                    }
                }
                SiteEvent::Bookmark(version) => resource_version = version,
            }
        }

        debug!("DummySite watch closed by server, resubscribing");
        self.backoff.reset();
        WatchState::Watching { resource_version }
    }

    async fn reconcile(&self, site: &DummySite) {
        if site.metadata.name.is_none() {
            debug!("Ignoring DummySite without a name");
            return;
        }

        if let Err(e) = self.reconciler.reconcile(site).await {
            error!("Failed to reconcile {}: {}", site.key(), e);
        }
    }
}
