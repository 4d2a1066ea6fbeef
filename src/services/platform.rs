// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! URL extraction from message text and platform classification.

use crate::models::Platform;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(?:https?://|www\.)[^\s<>"]+"#).unwrap());

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '>', '"', '\''];

const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "youtu.be"];
const INSTAGRAM_HOSTS: &[&str] = &["instagram.com", "instagr.am"];

/// Return the first URL in `text`, with trailing punctuation removed.
///
/// Bare `www.` links are promoted to `https://`.
pub fn extract_url(text: &str) -> Option<String> {
    RE_URL.find_iter(text).find_map(|m| {
        let candidate = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        let candidate = if candidate.len() >= 4 && candidate[..4].eq_ignore_ascii_case("www.") {
            format!("https://{}", candidate)
        } else {
            candidate.to_string()
        };

        // Skip tokens like "https://" with nothing after them
        Url::parse(&candidate)
            .ok()
            .filter(|u| u.host_str().is_some())
            .map(|_| candidate)
    })
}

/// Classify a URL by host. Subdomains match only on a dot boundary.
pub fn classify(url: &str) -> Platform {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_end_matches('.').to_ascii_lowercase()))
    else {
        return Platform::Unsupported;
    };

    if host_matches(&host, YOUTUBE_HOSTS) {
        Platform::YouTube
    } else if host_matches(&host, INSTAGRAM_HOSTS) {
        Platform::Instagram
    } else {
        Platform::Unsupported
    }
}

fn host_matches(host: &str, domains: &[&str]) -> bool {
    domains.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
