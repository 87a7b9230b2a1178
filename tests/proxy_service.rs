//! End-to-end tests: viewer client against the proxy service against a mock provider.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cityweather::api::ViewerClient;
use cityweather::error::WeatherError;
use cityweather::provider::{City, Coord, ProviderClient};
use cityweather::server::{self, AppState, WeatherProxy};
use cityweather::state::{CityRegistry, SelectionSynchronizer, SessionConfig};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEATHER_PATH: &str = "/data/2.5/weather";

fn cities() -> Vec<City> {
    vec![
        City {
            id: 2988507,
            name: "Paris".to_string(),
            country: "FR".to_string(),
            coord: Coord { lat: 48.85, lon: 2.35 },
        },
        City {
            id: 2643743,
            name: "London".to_string(),
            country: "GB".to_string(),
            coord: Coord { lat: 51.51, lon: -0.13 },
        },
    ]
}

fn paris() -> Value {
    json!({
        "id": 2988507,
        "name": "Paris",
        "weather": [{ "description": "light rain" }],
        "wind": { "speed": 4.1, "deg": 250 },
        "main": { "temp": 287.5, "humidity": 81 }
    })
}

/// Start the service on an ephemeral port and return its base URL.
async fn start(provider: &MockServer, public_dir: &Path) -> String {
    let client =
        ProviderClient::new(format!("{}{}", provider.uri(), WEATHER_PATH), "secret").unwrap();
    let registry = Arc::new(CityRegistry::from_cities(cities()));
    let state = Arc::new(AppState {
        proxy: WeatherProxy::new(client, registry, Duration::from_secs(3600)),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, server::router(state, public_dir)));
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_cities_payload_is_sorted() {
    let provider = MockServer::start().await;
    let public = TempDir::new().unwrap();
    let base = start(&provider, public.path()).await;

    let cities = ViewerClient::new(&base).unwrap().cities().await.unwrap();
    let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["London", "Paris"]);
}

#[tokio::test]
async fn test_id_lookup_fills_name_key() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("id", "2988507"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "paris,fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(0)
        .mount(&provider)
        .await;

    let public = TempDir::new().unwrap();
    let base = start(&provider, public.path()).await;
    let viewer = ViewerClient::new(&base).unwrap();

    let report = viewer.weather(2988507).await.unwrap();
    assert_eq!(report.description(), "light rain");
    // Served from cache under both keys.
    viewer.weather(2988507).await.unwrap();
    let slot = viewer.deep_link("paris", "fr").await.unwrap();
    assert!(!slot.is_empty());
}

#[tokio::test]
async fn test_deep_link_sets_bootstrap_cookie() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "paris,fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list": [paris()] })))
        .expect(1)
        .mount(&provider)
        .await;

    let public = TempDir::new().unwrap();
    let base = start(&provider, public.path()).await;
    let viewer = ViewerClient::new(&base).unwrap();

    let mut slot = viewer.deep_link("Paris", "FR").await.unwrap();
    let payload: Value = serde_json::from_str(&slot.take().unwrap()).unwrap();
    assert_eq!(payload["id"], 2988507);
    assert!(slot.take().is_none());

    // The id lookup is now a cache hit.
    viewer.weather(2988507).await.unwrap();
}

#[tokio::test]
async fn test_unknown_city_is_not_fetched() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(0)
        .mount(&provider)
        .await;

    let public = TempDir::new().unwrap();
    let base = start(&provider, public.path()).await;

    let err = ViewerClient::new(&base).unwrap().weather(1).await.unwrap_err();
    assert!(matches!(err, WeatherError::NotFound(_)));
}

#[tokio::test]
async fn test_bad_query_is_rejected() {
    let provider = MockServer::start().await;
    let public = TempDir::new().unwrap();
    let base = start(&provider, public.path()).await;

    let response = reqwest::get(format!("{}/weather?city=Paris", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Paris"));

    let response = reqwest::get(format!("{}/weather", base)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway_and_not_cached() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .expect(2)
        .mount(&provider)
        .await;

    let public = TempDir::new().unwrap();
    let base = start(&provider, public.path()).await;

    for _ in 0..2 {
        let response = reqwest::get(format!("{}/weather/2643743", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    }
}

#[tokio::test]
async fn test_static_files_are_served() {
    let provider = MockServer::start().await;
    let public = TempDir::new().unwrap();
    std::fs::write(public.path().join("index.html"), "<h1>weather</h1>").unwrap();
    let base = start(&provider, public.path()).await;

    let body = reqwest::get(format!("{}/index.html", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "<h1>weather</h1>");
}

#[tokio::test]
async fn test_viewer_session_over_http() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "paris,fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .mount(&provider)
        .await;

    let public = TempDir::new().unwrap();
    let base = start(&provider, public.path()).await;
    let viewer = ViewerClient::new(&base).unwrap();

    let cities = viewer.cities().await.unwrap();
    let mut bootstrap = viewer.deep_link("Paris", "FR").await.unwrap();

    let mut session = SelectionSynchronizer::new(SessionConfig::default());
    let request = session.load(cities, &mut bootstrap);

    // The deep-linked payload renders without another lookup.
    assert!(request.is_none());
    assert!(bootstrap.is_empty());
    assert_eq!(session.selected(), Some(2988507));
    assert_eq!(session.panel().description, "light rain");
    assert_eq!(session.panel().humidity, "81%");
}
