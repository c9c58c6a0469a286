// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery and converging owned resources.

pub mod apply;
pub mod crd;

pub use apply::{converge, CarryForward};
pub use crd::wait_for_crd;
