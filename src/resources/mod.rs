// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pure construction of the resources a DummySite owns.

pub mod builder;
pub mod naming;

pub use builder::{build_resources, content_digest, site_labels, DesiredResources};
pub use naming::derive_name;
