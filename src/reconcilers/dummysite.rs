// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! DummySite reconciler - fetches the website and converges ConfigMap, Deployment and Service.

use crate::config::Config;
use crate::content::ContentFetcher;
use crate::error::{DummySiteError, Result};
use crate::kubernetes::converge;
use crate::reconcilers::Reconcile;
use crate::resources::build_resources;
use crate::types::DummySite;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Service};
use kube::{Api, Client, ResourceExt};
use tracing::{debug, info, instrument, warn};

pub struct DummySiteReconciler<F> {
    client: Client,
    config: Config,
    fetcher: F,
}

impl<F: ContentFetcher> DummySiteReconciler<F> {
    pub fn new(client: Client, config: Config, fetcher: F) -> Self {
        Self {
            client,
            config,
            fetcher,
        }
    }
}

#[async_trait]
impl<F: ContentFetcher> Reconcile for DummySiteReconciler<F> {
    #[instrument(skip(self, site), fields(site = %site.key()))]
    async fn reconcile(&self, site: &DummySite) -> Result<()> {
        let Some(website_url) = site.website_url() else {
            warn!("{}: missing spec.website_url, skipping", site.key());
            return Ok(());
        };

        let namespace = site
            .namespace()
            .ok_or(DummySiteError::MissingObjectKey("namespace"))?;
        if site.uid().is_none() {
            return Err(DummySiteError::MissingObjectKey("uid"));
        }

        debug!("Fetching {}", website_url);
        let html = self.fetcher.fetch(website_url).await?;

        let desired = build_resources(site, &html, website_url, &self.config.nginx_image);

        let config_maps: Api<ConfigMap> = Api::namespaced(self.client.clone(), &namespace);
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), &namespace);
        let services: Api<Service> = Api::namespaced(self.client.clone(), &namespace);

        let config_map_name = desired.config_map.name_any();
        converge(&config_maps, &config_map_name, desired.config_map).await?;

        let deployment_name = desired.deployment.name_any();
        converge(&deployments, &deployment_name, desired.deployment).await?;

        let service_name = desired.service.name_any();
        converge(&services, &service_name, desired.service).await?;

        info!("Reconciled {} -> svc/{}", site.key(), service_name);
        Ok(())
    }
}
