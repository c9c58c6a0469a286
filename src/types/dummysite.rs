// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

/// A website to mirror into the cluster as a static nginx site.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "dummy.example.com",
    version = "v1alpha1",
    kind = "DummySite",
    plural = "dummysites",
    shortname = "ds"
)]
#[kube(namespaced)]
#[kube(printcolumn = r#"{"name":"URL","type":"string","jsonPath":".spec.website_url"}"#)]
pub struct DummySiteSpec {
    /// Page to fetch and serve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

impl DummySite {
    /// The website URL, if it is set and not blank
    pub fn website_url(&self) -> Option<&str> {
        self.spec
            .website_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// `namespace/name` key used in log lines
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace().unwrap_or_default(), self.name_any())
    }
}
