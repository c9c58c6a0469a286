// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use regex::Regex;
use std::sync::LazyLock;

static BASE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<base\s").expect("valid base tag regex"));

// `<head>` or `<head attr=...>`, but not `<header>`
static HEAD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head(\s[^>]*)?>").expect("valid head tag regex"));

/// Insert `<base href="{website_url}">` right after the opening `<head>` tag so relative
/// links keep resolving against the original site.
///
/// Documents that already declare a base, have no head element, or are empty are
/// returned unchanged.
pub fn inject_base_tag(html: &str, website_url: &str) -> String {
    if html.is_empty() || website_url.is_empty() || BASE_TAG.is_match(html) {
        return html.to_string();
    }

    let Some(head) = HEAD_OPEN.find(html) else {
        return html.to_string();
    };

    let index = head.end();
    format!(
        "{}\n  <base href=\"{}\">\n{}",
        &html[..index],
        website_url.replace('"', "&quot;"),
        &html[index..]
    )
}
