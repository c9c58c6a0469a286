// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Labels stamped on every derived resource
pub mod labels {
    /// Application label key
    pub const APP: &str = "app";
    /// Application label value shared by all derived resources
    pub const APP_VALUE: &str = "dummy-site";
    /// Carries the name of the owning DummySite
    pub const NAME: &str = "dummy.example.com/name";
}

/// Annotation keys written by the operator
pub mod annotations {
    /// SHA-256 of the served HTML, set on the pod template so content changes roll the pods
    pub const HTML_SHA256: &str = "dummy.example.com/html-sha256";
}

/// Role suffixes used when deriving names of owned resources
pub mod suffixes {
    pub const CONFIG_MAP: &str = "html";
    pub const DEPLOYMENT: &str = "site";
    pub const SERVICE: &str = "svc";
}

/// Keys inside the content ConfigMap
pub mod content {
    pub const INDEX_KEY: &str = "index.html";
    pub const SOURCE_URL_KEY: &str = "source-url.txt";
}

/// Web server layout inside the workload pod
pub mod nginx {
    pub const CONTAINER_NAME: &str = "nginx";
    pub const VOLUME_NAME: &str = "html";
    pub const HTML_ROOT: &str = "/usr/share/nginx/html";
    pub const HTTP_PORT: i32 = 80;
    pub const PORT_NAME: &str = "http";
}

/// User agent sent when fetching websites
pub const USER_AGENT: &str = "dummy-site-controller/1.0";

/// Maximum length of a Kubernetes DNS label
pub const MAX_NAME_LENGTH: usize = 63;

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
