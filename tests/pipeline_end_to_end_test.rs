use deal_flow::{Category, ExtractionError, Orchestrator, PipelineConfig, StrategyKind};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_HTML: &str = r#"
<html>
<head>
    <meta property="og:site_name" content="Flipkart">
</head>
<body>
    <div class="_7dPnhA"><a href="/">Home</a><a href="/mobiles">Mobiles</a></div>
    <span class="VU-ZEz">Galaxy M34 5G (Midnight Blue, 128 GB)</span>
    <div class="Nx9bqj CxhGGd">₹14,999</div>
    <div class="yRaY8j">₹19,999</div>
    <img class="DByuf4" src="/img/128/128/m34.jpeg">
</body>
</html>
"#;

fn config(server: &MockServer) -> PipelineConfig {
    PipelineConfig {
        ai_endpoint: Some(format!("{}/extract", server.uri())),
        categories: vec![Category::new("c-mobiles", "Mobiles")],
        ..PipelineConfig::default()
    }
}

async fn mount_short_link(server: &MockServer) {
    Mock::given(method("HEAD"))
        .and(path("/abc123"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/product/p/itm123", server.uri()).as_str()),
        )
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/product/p/itm123"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_heuristic_short_link_to_product() {
    let server = MockServer::start().await;
    mount_short_link(&server).await;
    Mock::given(method("GET"))
        .and(path("/product/p/itm123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = Orchestrator::from_config(&config(&server)).unwrap();
    let product = orchestrator
        .run(&format!("{}/abc123", server.uri()), StrategyKind::Heuristic)
        .await
        .unwrap();

    assert_eq!(product.title(), "Galaxy M34 5G (Midnight Blue, 128 GB)");
    assert_eq!(product.price(), 14999.0);
    assert_eq!(product.original_price(), 19999.0);
    assert_eq!(product.discount_percentage(), 25);
    assert_eq!(product.store(), "Flipkart");
    assert_eq!(product.category(), "c-mobiles");
    assert_eq!(product.link(), format!("{}/product/p/itm123", server.uri()));
    assert_eq!(product.image(), format!("{}/img/128/128/m34.jpeg", server.uri()));

    let record: serde_json::Value = serde_json::from_str(&product.to_json()).unwrap();
    assert_eq!(record["originalPrice"], json!(19999.0));
    assert_eq!(record["discountPercentage"], json!(25));
}

#[tokio::test]
async fn test_heuristic_fetch_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_short_link(&server).await;
    Mock::given(method("GET"))
        .and(path("/product/p/itm123"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let orchestrator = Orchestrator::from_config(&config(&server)).unwrap();
    let err = orchestrator
        .run(&format!("{}/abc123", server.uri()), StrategyKind::Heuristic)
        .await
        .unwrap_err();

    assert_eq!(err, ExtractionError::HttpError { status_code: 503 });
}

#[tokio::test]
async fn test_short_link_refusing_head_still_resolves() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/abc123"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/product/p/itm123"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/p/itm123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_HTML))
        .mount(&server)
        .await;

    let orchestrator = Orchestrator::from_config(&config(&server)).unwrap();
    let product = orchestrator
        .run(&format!("{}/abc123", server.uri()), StrategyKind::Heuristic)
        .await
        .unwrap();

    assert_eq!(product.link(), format!("{}/product/p/itm123", server.uri()));
    assert_eq!(product.price(), 14999.0);
}

#[tokio::test]
async fn test_ai_strategy_skips_fetching() {
    let server = MockServer::start().await;
    mount_short_link(&server).await;
    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": { "title": "Galaxy M34 5G", "price": 14999, "originalPrice": 19999 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let orchestrator = Orchestrator::from_config(&config(&server)).unwrap();
    let product = orchestrator
        .run(&format!("{}/abc123?utm_source=share", server.uri()), StrategyKind::Ai)
        .await
        .unwrap();

    assert_eq!(product.discount_percentage(), 25);
    // * The pasted short link never survives into the record
    assert_eq!(product.link(), format!("{}/product/p/itm123", server.uri()));
}

#[tokio::test]
async fn test_ai_strategy_unconfigured() {
    let orchestrator = Orchestrator::from_config(&PipelineConfig::default()).unwrap();
    let err = orchestrator
        .run("https://www.flipkart.com/p/itm123", StrategyKind::Ai)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::UpstreamError { .. }));
}

#[tokio::test]
async fn test_invalid_input_url() {
    let orchestrator = Orchestrator::from_config(&PipelineConfig::default()).unwrap();
    for strategy in [StrategyKind::Heuristic, StrategyKind::Ai] {
        let err = orchestrator.run("flipkart dot com", strategy).await.unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUrl(_)));
    }
}
