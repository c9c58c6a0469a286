// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Read-then-replace convergence of owned resources.

use crate::error::{is_not_found, Result};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Service};
use kube::{api::PostParams, Api, Resource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, info, instrument};

/// Fields the platform assigns that must survive a full replace.
pub trait CarryForward {
    /// Copy platform-owned fields from the live object into `self` where `self` leaves them unset.
    fn carry_forward(&mut self, _existing: &Self) {}
}

impl CarryForward for ConfigMap {}

impl CarryForward for Deployment {}

impl CarryForward for Service {
    /// clusterIP, clusterIPs, ipFamilies and ipFamilyPolicy are allocated on create
    /// and rejected if an update tries to clear them.
    fn carry_forward(&mut self, existing: &Self) {
        let Some(live) = existing.spec.as_ref() else {
            return;
        };
        let spec = self.spec.get_or_insert_with(Default::default);

        if is_unset(&spec.cluster_ip) {
            spec.cluster_ip = live.cluster_ip.clone();
        }
        if spec.cluster_ips.as_ref().map_or(true, Vec::is_empty) {
            spec.cluster_ips = live.cluster_ips.clone();
        }
        if spec.ip_families.as_ref().map_or(true, Vec::is_empty) {
            spec.ip_families = live.ip_families.clone();
        }
        if is_unset(&spec.ip_family_policy) {
            spec.ip_family_policy = live.ip_family_policy.clone();
        }
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Converge `desired` into the cluster under `name`.
///
/// An existing object is replaced, carrying over its resourceVersion and any
/// platform-owned fields; a missing one is created. Other API failures are returned
/// as-is.
#[instrument(skip(api, desired), fields(kind = %K::kind(&())))]
pub async fn converge<K>(api: &Api<K>, name: &str, mut desired: K) -> Result<K>
where
    K: Resource<DynamicType = ()> + CarryForward + Clone + Debug + Serialize + DeserializeOwned,
{
    desired.meta_mut().name = Some(name.to_string());

    match api.get(name).await {
        Ok(existing) => {
            desired.meta_mut().resource_version = existing.resource_version();
            desired.carry_forward(&existing);

            let replaced = api.replace(name, &PostParams::default(), &desired).await?;
            debug!(
                "Replaced {} {} at resourceVersion {}",
                K::kind(&()),
                name,
                replaced.resource_version().unwrap_or_default()
            );
            Ok(replaced)
        }
        Err(e) if is_not_found(&e) => {
            desired.meta_mut().resource_version = None;

            let created = api.create(&PostParams::default(), &desired).await?;
            info!("Created {} {}", K::kind(&()), name);
            Ok(created)
        }
        Err(e) => Err(e.into()),
    }
}
