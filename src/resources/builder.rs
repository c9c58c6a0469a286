// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Desired ConfigMap, Deployment and Service for a DummySite.

use crate::constants::{annotations, content, labels, nginx, suffixes};
use crate::resources::naming::derive_name;
use crate::types::DummySite;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapVolumeSource, Container, ContainerPort, KeyToPath, PodSpec,
    PodTemplateSpec, Service, ServicePort, ServiceSpec, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, OwnerReference};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// The three objects a DummySite is materialized into
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredResources {
    pub config_map: ConfigMap,
    pub deployment: Deployment,
    pub service: Service,
}

/// Hex encoded SHA-256 of the served HTML
pub fn content_digest(html: &str) -> String {
    format!("{:x}", Sha256::digest(html.as_bytes()))
}

/// Labels shared by all derived resources, also used as selector
pub fn site_labels(site_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::APP.to_string(), labels::APP_VALUE.to_string()),
        (labels::NAME.to_string(), site_name.to_string()),
    ])
}

/// Controller owner reference pointing back at the DummySite
pub fn owner_reference(site: &DummySite) -> OwnerReference {
    OwnerReference {
        api_version: DummySite::api_version(&()).into_owned(),
        kind: DummySite::kind(&()).into_owned(),
        name: site.name_any(),
        uid: site.uid().unwrap_or_default(),
        controller: Some(true),
        block_owner_deletion: Some(true),
    }
}

/// Build the desired resources for `site` serving `html` fetched from `website_url`.
pub fn build_resources(
    site: &DummySite,
    html: &str,
    website_url: &str,
    image: &str,
) -> DesiredResources {
    let site_name = site.name_any();
    let labels = site_labels(&site_name);

    let config_map_name = derive_name(&site_name, suffixes::CONFIG_MAP);
    let deployment_name = derive_name(&site_name, suffixes::DEPLOYMENT);
    let service_name = derive_name(&site_name, suffixes::SERVICE);

    let metadata = |name: &str| ObjectMeta {
        name: Some(name.to_string()),
        namespace: site.namespace(),
        labels: Some(labels.clone()),
        owner_references: Some(vec![owner_reference(site)]),
        ..Default::default()
    };

    let config_map = ConfigMap {
        metadata: metadata(&config_map_name),
        data: Some(BTreeMap::from([
            (content::INDEX_KEY.to_string(), html.to_string()),
            (content::SOURCE_URL_KEY.to_string(), website_url.to_string()),
        ])),
        ..Default::default()
    };

    let deployment = Deployment {
        metadata: metadata(&deployment_name),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels.clone()),
                    annotations: Some(BTreeMap::from([(
                        annotations::HTML_SHA256.to_string(),
                        content_digest(html),
                    )])),
                    ..Default::default()
                }),
                spec: Some(nginx_pod_spec(&config_map_name, image)),
            },
            ..Default::default()
        }),
        ..Default::default()
    };

    let service = Service {
        metadata: metadata(&service_name),
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            selector: Some(labels.clone()),
            ports: Some(vec![ServicePort {
                name: Some(nginx::PORT_NAME.to_string()),
                port: nginx::HTTP_PORT,
                target_port: Some(IntOrString::Int(nginx::HTTP_PORT)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    };

    DesiredResources {
        config_map,
        deployment,
        service,
    }
}

fn nginx_pod_spec(config_map_name: &str, image: &str) -> PodSpec {
    PodSpec {
        containers: vec![Container {
            name: nginx::CONTAINER_NAME.to_string(),
            image: Some(image.to_string()),
            ports: Some(vec![ContainerPort {
                container_port: nginx::HTTP_PORT,
                ..Default::default()
            }]),
            volume_mounts: Some(vec![VolumeMount {
                name: nginx::VOLUME_NAME.to_string(),
                mount_path: nginx::HTML_ROOT.to_string(),
                read_only: Some(true),
                ..Default::default()
            }]),
            ..Default::default()
        }],
        volumes: Some(vec![Volume {
            name: nginx::VOLUME_NAME.to_string(),
            config_map: Some(ConfigMapVolumeSource {
                name: config_map_name.to_string(),
                items: Some(vec![KeyToPath {
                    key: content::INDEX_KEY.to_string(),
                    path: content::INDEX_KEY.to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    }
}
