use crate::network::errors::ExtractionError;
use url::Url;

// * Tracking and affiliate parameters stripped from the final product link.
// * `ref`/`ref_`/`tag` are Amazon referral and affiliate markers, `affid` is Flipkart's.
// ! Add new tracking params here as they are discovered.
const TRACKING_PARAMS: [&str; 8] = ["gclid", "fbclid", "yclid", "_ga", "ref", "ref_", "tag", "affid"];
const TRACKING_PREFIX: &str = "utm_";

// * Validates that `raw` is an absolute http(s) URL with a host.
pub fn parse_absolute_url(raw: &str) -> Result<Url, ExtractionError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| ExtractionError::InvalidUrl(trimmed.to_string()))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ExtractionError::InvalidUrl(trimmed.to_string())),
    }
}

// * Resolves a (possibly relative or protocol-relative) href against the page URL.
pub fn resolve_against(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("data:") {
        return None;
    }

    let base = Url::parse(base_url).ok()?;
    let url = base.join(href).ok()?;

    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

// * Canonical form of the final product link.
// *
// * 1. Strip Fragment (#).
// * 2. Lowercase Hostname.
// * 3. Remove Tracking Parameters (utm_*, gclid, ...), keeping the order of the rest.
// *
// * Unparsable input is returned unchanged.
pub fn canonicalize_link(raw: &str) -> String {
    let mut url = match Url::parse(raw.trim()) {
        Ok(u) => u,
        Err(_) => return raw.trim().to_string(),
    };

    url.set_fragment(None);

    if let Some(host) = url.host_str() {
        let lower_host = host.to_lowercase();
        if lower_host != host && url.set_host(Some(&lower_host)).is_err() {
            return raw.trim().to_string();
        }
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| {
            let key = k.to_lowercase();
            !key.starts_with(TRACKING_PREFIX) && !TRACKING_PARAMS.contains(&key.as_str())
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if url.query().is_some() {
        if kept.is_empty() {
            url.set_query(None);
        } else {
            let mut serializer = url.query_pairs_mut();
            serializer.clear();
            for (k, v) in &kept {
                serializer.append_pair(k, v);
            }
        }
    }

    url.to_string()
}

// * Derives a display store name from the link's host: `www.flipkart.com` -> `Flipkart`.
pub fn store_from_host(raw: &str) -> String {
    let host = match Url::parse(raw.trim()).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(h) => h,
        None => return String::new(),
    };

    // ? IP hosts carry no brand
    if host.parse::<std::net::IpAddr>().is_ok() {
        return String::new();
    }

    let trimmed = ["www.", "m.", "shop.", "store."]
        .iter()
        .find_map(|prefix| host.strip_prefix(prefix))
        .unwrap_or(&host);

    let label = trimmed.split('.').next().unwrap_or_default();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
