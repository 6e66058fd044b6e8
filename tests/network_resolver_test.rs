use deal_flow::network::resolver::LinkResolver;
use deal_flow::ExtractionError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn redirect(server: &MockServer, from: &str, to: &str) {
    Mock::given(method("HEAD"))
        .and(path(from))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", to))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_follows_redirect_chain() {
    let server = MockServer::start().await;
    redirect(&server, "/s/abc", &format!("{}/hop", server.uri())).await;
    redirect(&server, "/hop", &format!("{}/product/p/itm123", server.uri())).await;
    Mock::given(method("HEAD"))
        .and(path("/product/p/itm123"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let resolver = LinkResolver::with_defaults().unwrap();
    let resolved = resolver.resolve(&format!("{}/s/abc", server.uri())).await.unwrap();
    assert_eq!(resolved, format!("{}/product/p/itm123", server.uri()));
}

#[tokio::test]
async fn test_relative_location_joined() {
    let server = MockServer::start().await;
    redirect(&server, "/s/abc", "/product/p/itm123?pid=9").await;

    let resolver = LinkResolver::with_defaults().unwrap();
    let resolved = resolver.resolve(&format!("{}/s/abc", server.uri())).await.unwrap();
    assert_eq!(resolved, format!("{}/product/p/itm123?pid=9", server.uri()));
}

#[tokio::test]
async fn test_non_redirect_returns_input() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let resolver = LinkResolver::with_defaults().unwrap();
    let url = format!("{}/product/p/itm123", server.uri());
    assert_eq!(resolver.resolve(&url).await.unwrap(), url);
}

#[tokio::test]
async fn test_redirect_cap_exceeded() {
    let server = MockServer::start().await;
    // * /loop redirects to itself forever
    redirect(&server, "/loop", "/loop").await;

    let resolver = LinkResolver::new(Duration::from_secs(5), 5).unwrap();
    let err = resolver.resolve(&format!("{}/loop", server.uri())).await.unwrap_err();
    assert_eq!(err, ExtractionError::TooManyRedirects(5));
    assert!(!err.is_fatal());

    // * Best-effort form falls back to the input
    let url = format!("{}/loop", server.uri());
    assert_eq!(resolver.resolve_or_original(&url).await, url);
}

#[tokio::test]
async fn test_exactly_max_hops_is_allowed() {
    let server = MockServer::start().await;
    for hop in 0..5 {
        redirect(&server, &format!("/h{hop}"), &format!("/h{}", hop + 1)).await;
    }
    Mock::given(method("HEAD"))
        .and(path("/h5"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let resolver = LinkResolver::with_defaults().unwrap();
    let resolved = resolver.resolve(&format!("{}/h0", server.uri())).await.unwrap();
    assert_eq!(resolved, format!("{}/h5", server.uri()));
}

#[tokio::test]
async fn test_invalid_url() {
    let resolver = LinkResolver::with_defaults().unwrap();
    let err = resolver.resolve("not a url").await.unwrap_err();
    assert!(matches!(err, ExtractionError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_network_failure_keeps_original() {
    let resolver = LinkResolver::with_defaults().unwrap();
    let url = "http://127.0.0.1:1/s/abc";
    assert_eq!(resolver.resolve(url).await.unwrap(), url);
}
