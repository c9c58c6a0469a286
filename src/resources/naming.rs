// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deterministic, length-safe names for owned resources.

use crate::constants::MAX_NAME_LENGTH;
use sha2::{Digest, Sha256};

const HASH_LENGTH: usize = 8;

/// Derive a DNS-label-safe name `{base}-{suffix}` for a resource owned by `base`.
///
/// Both parts are lower-cased and every run of characters outside `[a-z0-9]` becomes a
/// single hyphen. Joins longer than 63 characters get the base truncated and an 8 hex
/// character hash of the full join appended, so the result stays a pure function of
/// the inputs. The result is always cut at 63 characters, so a suffix longer than about
/// 53 characters pushes part or all of the hash off the end.
pub fn derive_name(base: &str, suffix: &str) -> String {
    let base = sanitize(base);
    let suffix = sanitize(suffix);
    let joined = join(&base, &suffix);

    if joined.is_empty() {
        // Nothing usable in either part; the hash alone is still a valid label.
        return short_hash(&joined);
    }
    if joined.len() <= MAX_NAME_LENGTH {
        return joined;
    }

    let hash = short_hash(&joined);
    let reserved = if suffix.is_empty() { 0 } else { suffix.len() + 1 } + 1 + HASH_LENGTH;
    let max_base = MAX_NAME_LENGTH.saturating_sub(reserved).max(1);
    let truncated = base[..base.len().min(max_base)].trim_end_matches('-');

    let rebuilt = join(&join(truncated, &suffix), &hash);
    let capped = &rebuilt[..rebuilt.len().min(MAX_NAME_LENGTH)];
    capped.trim_matches('-').to_string()
}

/// Lower-case and collapse runs of disallowed characters into single hyphens.
fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    out
}

fn join(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (false, true) => left.to_string(),
        (false, false) => format!("{}-{}", left, right),
    }
}

fn short_hash(input: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(input.as_bytes()));
    digest[..HASH_LENGTH].to_string()
}
