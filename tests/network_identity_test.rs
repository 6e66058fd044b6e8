use deal_flow::network::identity::BrowserIdentity;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};

#[test]
fn test_desktop_chrome_structure() {
    let identity = BrowserIdentity::desktop_chrome();
    assert_eq!(identity.chrome_version, "124");
    assert!(identity.user_agent.contains("Chrome/124."));
    assert!(identity.sec_ch_ua.contains(r#""Google Chrome";v="124""#));
}

#[test]
fn test_headers_integrity() {
    let identity = BrowserIdentity::desktop_chrome();
    let headers = identity.headers();

    let ua = headers.get(USER_AGENT).unwrap().to_str().unwrap();
    assert_eq!(ua, identity.user_agent);
    assert_eq!(headers.get(ACCEPT_LANGUAGE).unwrap(), identity.accept_language);
    assert_eq!(headers.get("sec-ch-ua-mobile").unwrap(), "?0");
    assert_eq!(headers.get("sec-ch-ua-platform").unwrap(), r#""Windows""#);
}
