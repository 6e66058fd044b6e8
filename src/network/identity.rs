use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

// * BrowserIdentity defines the headers a desktop browser would send.
// * Storefronts vary markup (or refuse service) for default client identifiers.
#[derive(Debug, Clone)]
pub struct BrowserIdentity {
    pub chrome_version: &'static str,
    pub user_agent: String,
    pub accept_language: &'static str,
    pub sec_ch_ua: String,
    pub sec_ch_ua_platform: &'static str,
}

impl BrowserIdentity {
    // * Desktop Chrome on Windows.
    pub fn desktop_chrome() -> Self {
        let major_version = "124";
        let full_version = "124.0.6367.207";

        Self {
            chrome_version: major_version,
            user_agent: format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
                full_version
            ),
            accept_language: "en-IN,en-US;q=0.9,en;q=0.8",
            sec_ch_ua: format!(
                r#""Chromium";v="{}", "Google Chrome";v="{}", "Not-A.Brand";v="99""#,
                major_version, major_version
            ),
            sec_ch_ua_platform: r#""Windows""#,
        }
    }

    // * Builds the default header set for page and redirect requests.
    // * Values that fail header validation are skipped rather than aborting client setup.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(ua) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        if let Ok(lang) = HeaderValue::from_str(self.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, lang);
        }
        if let Ok(ch_ua) = HeaderValue::from_str(&self.sec_ch_ua) {
            headers.insert("sec-ch-ua", ch_ua);
        }
        if let Ok(platform) = HeaderValue::from_str(self.sec_ch_ua_platform) {
            headers.insert("sec-ch-ua-platform", platform);
        }

        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

        headers
    }
}

impl Default for BrowserIdentity {
    fn default() -> Self {
        Self::desktop_chrome()
    }
}
