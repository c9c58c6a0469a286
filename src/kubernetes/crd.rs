// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Waiting for a custom resource to be served before watching it.

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use kube::{discovery::Discovery, Client, Resource};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Block until the API server serves `K` at its compiled-in group/version.
///
/// Polls discovery, doubling the wait from POLL_INTERVAL_SECS up to
/// POLL_MAX_INTERVAL_SECS. Discovery failures are logged and retried.
pub async fn wait_for_crd<K>(client: &Client) -> Result<()>
where
    K: Resource<DynamicType = ()>,
{
    let kind = K::kind(&());
    let api_version = K::api_version(&());
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match is_served::<K>(client).await {
            Ok(true) => {
                info!("{} ({}) is served", kind, api_version);
                return Ok(());
            }
            Ok(false) => info!("{} ({}) not served yet, next check in {}s", kind, api_version, interval),
            Err(e) => warn!("Discovery of {} failed: {}, next check in {}s", api_version, e, interval),
        }

        sleep(Duration::from_secs(interval)).await;
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

/// Whether discovery lists `K`'s kind under its group at its version.
async fn is_served<K>(client: &Client) -> Result<bool>
where
    K: Resource<DynamicType = ()>,
{
    let group = K::group(&());
    let discovery = Discovery::new(client.clone()).filter(&[group.as_ref()]).run().await?;

    let Some(api_group) = discovery.get(&group) else {
        return Ok(false);
    };
    let served = api_group
        .versioned_resources(&K::version(&()))
        .iter()
        .any(|(ar, _)| ar.kind == K::kind(&()));
    Ok(served)
}
