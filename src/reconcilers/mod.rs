// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation of DummySites into their owned resources.

pub mod dummysite;

pub use dummysite::DummySiteReconciler;

use crate::error::Result;
use crate::types::DummySite;
use async_trait::async_trait;

/// Converges the cluster towards the state described by a single DummySite
#[async_trait]
pub trait Reconcile: Send + Sync {
    async fn reconcile(&self, site: &DummySite) -> Result<()>;
}
