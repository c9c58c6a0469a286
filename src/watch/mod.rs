// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Watching DummySites and feeding them to the reconciler.

pub mod backoff;
pub mod manager;
pub mod source;

pub use backoff::Backoff;
pub use manager::{WatchLoop, WatchState};
pub use source::{KubeSiteSource, SiteEvent, SiteList, SiteSource};
