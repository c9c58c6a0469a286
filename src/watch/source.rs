// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Listing and watching DummySites.

use crate::error::{DummySiteError, Result};
use crate::types::DummySite;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use kube::api::{ListParams, WatchEvent, WatchParams};
use kube::{Api, Client};
use tracing::instrument;

/// Server side watch timeout; stays below the client's read timeout.
const WATCH_TIMEOUT_SECS: u32 = 290;

/// A change notification for a DummySite
#[derive(Debug, Clone)]
pub enum SiteEvent {
    Added(DummySite),
    Modified(DummySite),
    Deleted(DummySite),
    /// Progress marker carrying a newer resourceVersion
    Bookmark(String),
}

/// Snapshot of all DummySites and the version it was taken at
#[derive(Debug, Clone, Default)]
pub struct SiteList {
    pub items: Vec<DummySite>,
    pub resource_version: String,
}

/// Where the watch loop gets DummySites from
#[async_trait]
pub trait SiteSource: Send + Sync {
    async fn list(&self) -> Result<SiteList>;

    /// Subscribe to changes after `resource_version`. The stream ends cleanly when the
    /// server closes the watch and yields an error when the watch breaks.
    async fn watch(&self, resource_version: &str) -> Result<BoxStream<'static, Result<SiteEvent>>>;
}

/// DummySites of one namespace, read from the Kubernetes API
#[derive(Clone)]
pub struct KubeSiteSource {
    api: Api<DummySite>,
}

impl KubeSiteSource {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
        }
    }
}

#[async_trait]
impl SiteSource for KubeSiteSource {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<SiteList> {
        let list = self.api.list(&ListParams::default()).await?;
        Ok(SiteList {
            resource_version: list.metadata.resource_version.unwrap_or_default(),
            items: list.items,
        })
    }

    #[instrument(skip(self))]
    async fn watch(&self, resource_version: &str) -> Result<BoxStream<'static, Result<SiteEvent>>> {
        let wp = WatchParams::default().timeout(WATCH_TIMEOUT_SECS);
        let stream = self.api.watch(&wp, resource_version).await?;

        Ok(stream
            .map(|event| match event {
                Ok(WatchEvent::Added(site)) => Ok(SiteEvent::Added(site)),
                Ok(WatchEvent::Modified(site)) => Ok(SiteEvent::Modified(site)),
                Ok(WatchEvent::Deleted(site)) => Ok(SiteEvent::Deleted(site)),
                Ok(WatchEvent::Bookmark(bookmark)) => {
                    Ok(SiteEvent::Bookmark(bookmark.metadata.resource_version))
                }
                Ok(WatchEvent::Error(status)) => Err(DummySiteError::WatchError(format!(
                    "{} ({}): {}",
                    status.reason, status.code, status.message
                ))),
                Err(e) => Err(e.into()),
            })
            .boxed())
    }
}
