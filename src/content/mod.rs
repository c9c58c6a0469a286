// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fetching website HTML and preparing it for static serving.

pub mod fetcher;
pub mod html;

pub use fetcher::{ContentFetcher, HttpFetcher};
pub use html::inject_base_tag;
