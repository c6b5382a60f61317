//! End-to-end tests for the HTTP endpoint.
//!
//! The server runs on an ephemeral port against a wiremock provider; a
//! non-following reqwest client inspects the redirects.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use quickopen::config::{AppConfig, ENV_ENDPOINT, ServerConfig};
use quickopen::server::REQUEST_ID_HEADER;
use quickopen::QuickOpenServer;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn config_for(provider: &MockServer) -> AppConfig {
    let mut config = AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        ..AppConfig::default()
    };
    config.provider.api_key = Some("test-key".into());
    config.provider.base_url = provider.uri();
    config
}

async fn start(provider: &MockServer) -> QuickOpenServer {
    QuickOpenServer::start(&config_for(provider)).await.unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn well_known_site_redirects_without_searching() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&provider)
        .await;
    let server = start(&provider).await;

    let response = client()
        .get(format!("http://{}/api", server.addr()))
        .query(&[("q", "Hacker News")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::FOUND);
    assert_eq!(location(&response), "https://news.ycombinator.com/");
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn bare_host_redirects_to_https() {
    let provider = MockServer::start().await;
    let server = start(&provider).await;

    let response = client()
        .get(format!("http://{}/api?q=docs.rs/tokio", server.addr()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::FOUND);
    assert_eq!(location(&response), "https://docs.rs/tokio");
}

#[tokio::test]
async fn repo_query_redirects_to_ranked_winner() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "test-key"))
        .and(body_partial_json(json!({
            "query": "github segmentanything",
            "category": "github"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "url": "https://github.com/facebookresearch/segment-anything/issues/42", "score": 0.31 },
                { "url": "https://github.com/facebookresearch/segment-anything", "score": 0.29 }
            ]
        })))
        .expect(1)
        .mount(&provider)
        .await;
    let server = start(&provider).await;

    let response = client()
        .get(format!("http://{}/api", server.addr()))
        .query(&[("q", "github segmentanything")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://github.com/facebookresearch/segment-anything"
    );
}

#[tokio::test]
async fn provider_failure_redirects_to_fallback() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(2)
        .mount(&provider)
        .await;
    let server = start(&provider).await;

    let response = client()
        .get(format!("http://{}/api", server.addr()))
        .query(&[("q", "stripe")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://www.google.com/search?q=stripe&btnI=1"
    );
}

#[tokio::test]
async fn debug_mode_returns_resolution_json() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&provider)
        .await;
    let server = start(&provider).await;

    let response = client()
        .get(format!("http://{}/api", server.addr()))
        .query(&[("q", "nextjs routing"), ("debug", "1")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["intent"], "docs");
    assert_eq!(body["reason"], "docs-auto");
    assert_eq!(body["source"], "fallback");
    assert_eq!(
        body["url"],
        "https://www.google.com/search?q=nextjs%20routing&btnI=1"
    );
    assert_eq!(body["fallback_url"], body["url"]);
    let phases = body["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0]["phase"], "primary");
    assert_eq!(phases[1]["phase"], "retry");
    assert!(phases[0]["error"]
        .as_str()
        .unwrap()
        .contains("upstream exploded"));
}

#[tokio::test]
async fn empty_query_redirects_home() {
    let provider = MockServer::start().await;
    let server = start(&provider).await;

    for url in [
        format!("http://{}/api", server.addr()),
        format!("http://{}/api?q=%20%20", server.addr()),
    ] {
        let response = client().get(url).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::FOUND);
        assert_eq!(location(&response), "/");
    }
}

#[tokio::test]
async fn index_and_health() {
    let provider = MockServer::start().await;
    let server = start(&provider).await;
    let base = format!("http://{}", server.addr());

    let index = client().get(format!("{base}/")).send().await.unwrap();
    assert_eq!(index.status(), reqwest::StatusCode::OK);
    assert!(index.text().await.unwrap().contains("<form"));

    let health = client().get(format!("{base}/healthz")).send().await.unwrap();
    assert_eq!(health.status(), reqwest::StatusCode::OK);
    assert_eq!(health.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn shutdown_stops_serving() {
    let provider = MockServer::start().await;
    let server = start(&provider).await;
    let url = format!("http://{}/healthz", server.addr());

    server.shutdown();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert!(client().get(url).send().await.is_err());
}

#[tokio::test]
async fn malformed_endpoint_still_serves_fallback() {
    let provider = MockServer::start().await;
    let mut config = config_for(&provider);
    config
        .apply_env(|key| (key == ENV_ENDPOINT).then(|| "::nope::".to_owned()))
        .unwrap();
    let server = QuickOpenServer::start(&config).await.unwrap();
    assert_ne!(server.port(), 0);

    let response = client()
        .get(format!("http://127.0.0.1:{}/api", server.port()))
        .query(&[("q", "stripe")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::FOUND);
    assert_eq!(
        location(&response),
        "https://www.google.com/search?q=stripe&btnI=1"
    );
}
