// * Image Resolution Selector
// * Picks the highest-fidelity candidate from src/srcset, then upgrades
// * recognized low-resolution size tokens in CDN URLs.

use crate::config::constants::IMAGE_TARGET_SIZE;
use regex::{Captures, Regex};
use std::sync::LazyLock;

// * Flipkart-style resize path: /image/128/128/...
static PATTERN_PATH_BOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/image/(\d{2,4})/(\d{2,4})/").expect("Invalid path box regex")
});

// * Amazon-style size token: ._AC_SX300_. / ._SY450_. / ._AC_UL320_.
static PATTERN_SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\._((?:AC_)?(?:SX|SY|SL|SS|UX|UY|UL))(\d{2,4})_\.").expect("Invalid size token regex")
});

// * Generic CDN resize segment: /300x300/
static PATTERN_WXH_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(\d{2,4})x(\d{2,4})/").expect("Invalid WxH segment regex")
});

/// Returns the best image URL for an `<img>` element's `src`/`srcset` pair.
///
/// With a `srcset`, the candidate with the largest width/density descriptor
/// wins (ties keep the earlier candidate, a missing descriptor counts as `1x`).
/// Without one, `src` is used. The result then goes through
/// [`upgrade_resolution`].
pub fn select_best(src: Option<&str>, srcset: Option<&str>) -> String {
    let chosen = srcset
        .and_then(best_srcset_candidate)
        .or_else(|| {
            src.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_default();

    upgrade_resolution(&chosen)
}

fn best_srcset_candidate(srcset: &str) -> Option<String> {
    let mut best: Option<(f64, &str)> = None;

    for (url, score) in srcset_candidates(srcset) {
        // ? Lazy-load placeholders are never the best image
        if url.starts_with("data:") {
            continue;
        }

        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, url)),
        }
    }

    best.map(|(_, url)| url.to_string())
}

// * Splits a srcset into (url, descriptor value) pairs the way browsers do:
// * the URL runs to the next whitespace, so commas inside it (Cloudinary
// * `w_300,h_300`) stay put. Only a comma after the descriptor ends a candidate.
fn srcset_candidates(srcset: &str) -> Vec<(&str, f64)> {
    let mut candidates = Vec::new();
    let mut rest = srcset;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }

        let url_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (url, tail) = rest.split_at(url_end);

        // * "a.jpg, b.jpg 2x": trailing commas end a descriptor-less candidate
        if url.ends_with(',') {
            candidates.push((url.trim_end_matches(','), 1.0));
            rest = tail;
            continue;
        }

        let descriptor_end = tail.find(',').unwrap_or(tail.len());
        let score = tail[..descriptor_end]
            .split_whitespace()
            .next()
            .map(descriptor_value)
            .unwrap_or(1.0);

        candidates.push((url, score));
        rest = &tail[descriptor_end..];
    }

    candidates
}

// * "640w" -> 640, "2x" -> 2, "1.5x" -> 1.5; anything else counts as 1x
fn descriptor_value(token: &str) -> f64 {
    let token = token.trim().to_ascii_lowercase();
    token
        .strip_suffix('w')
        .or_else(|| token.strip_suffix('x'))
        .and_then(|n| n.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(1.0)
}

/// Rewrites known low-resolution size tokens to [`IMAGE_TARGET_SIZE`].
///
/// Only recognized URL shapes are touched and only when the encoded size is
/// smaller than the target; everything else is returned unchanged.
pub fn upgrade_resolution(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    let target = IMAGE_TARGET_SIZE;

    if PATTERN_PATH_BOX.is_match(url) {
        return PATTERN_PATH_BOX
            .replace(url, |caps: &Captures| match parse_dims(&caps[1], &caps[2]) {
                Some((w, h)) if w < target && h < target => {
                    let (nw, nh) = scale_to_target(w, h, target);
                    format!("/image/{nw}/{nh}/")
                }
                _ => caps[0].to_string(),
            })
            .into_owned();
    }

    if PATTERN_SIZE_TOKEN.is_match(url) {
        return PATTERN_SIZE_TOKEN
            .replace(url, |caps: &Captures| match caps[2].parse::<u32>() {
                Ok(size) if size < target => format!("._{}{}_.", &caps[1], target),
                _ => caps[0].to_string(),
            })
            .into_owned();
    }

    if PATTERN_WXH_SEGMENT.is_match(url) {
        return PATTERN_WXH_SEGMENT
            .replace(url, |caps: &Captures| match parse_dims(&caps[1], &caps[2]) {
                Some((w, h)) if w < target && h < target => {
                    let (nw, nh) = scale_to_target(w, h, target);
                    format!("/{nw}x{nh}/")
                }
                _ => caps[0].to_string(),
            })
            .into_owned();
    }

    url.to_string()
}

fn parse_dims(w: &str, h: &str) -> Option<(u32, u32)> {
    let w = w.parse::<u32>().ok().filter(|v| *v > 0)?;
    let h = h.parse::<u32>().ok().filter(|v| *v > 0)?;
    Some((w, h))
}

// * Scales the longer edge to `target`, keeping the aspect ratio
fn scale_to_target(w: u32, h: u32, target: u32) -> (u32, u32) {
    if w >= h {
        let nh = (h as f64 * target as f64 / w as f64).round() as u32;
        (target, nh.max(1))
    } else {
        let nw = (w as f64 * target as f64 / h as f64).round() as u32;
        (nw.max(1), target)
    }
}
