//! End-to-end tests for WeatherApp: search, startup load and persistence.

mod common;

use common::{test_config, timeline_json, timeline_path, RecordingView};
use skycast_core::{AppError, LocationError};
use skycast_weather::{LastCityStore, NoticeKind, PresentOutcome, WeatherApp};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_core::LocationSourceKind::{Auto, Ip, LastCity, Timezone};

#[tokio::test]
async fn test_successful_search_is_remembered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(timeline_path("Oslo")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(timeline_json("Oslo, Norway", "snow", 6)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        dir.path(),
        &server.uri(),
        "http://unused/json/",
        vec![LastCity, Auto],
        None,
    );
    let view = Arc::new(RecordingView::default());
    let app = WeatherApp::new(&config, view.clone()).unwrap();

    let outcome = app.search(" Oslo ").await;
    assert!(outcome.is_rendered());
    assert_eq!(view.last().card.unwrap().city, "Oslo, Norway");

    let store = LastCityStore::new(dir.path());
    assert_eq!(store.load().as_deref(), Some("Oslo"));
}

#[tokio::test]
async fn test_failed_search_is_not_remembered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(timeline_path("Atlantis")))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("Bad API Request:Invalid location parameter value."),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = LastCityStore::new(dir.path());
    store.save("Oslo").unwrap();

    let config = test_config(dir.path(), &server.uri(), "http://unused/json/", vec![Auto], None);
    let view = Arc::new(RecordingView::default());
    let app = WeatherApp::new(&config, view.clone()).unwrap();

    let outcome = app.search("Atlantis").await;
    assert!(matches!(outcome, PresentOutcome::Failed(_)));
    assert!(view.last().notice.unwrap().message.contains("Invalid location"));
    assert_eq!(store.load().as_deref(), Some("Oslo"));
}

#[tokio::test]
async fn test_blank_search_prompts_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), &server.uri(), "http://unused/json/", vec![Auto], None);
    let view = Arc::new(RecordingView::default());
    let app = WeatherApp::new(&config, view.clone()).unwrap();

    let outcome = app.search("   ").await;
    assert!(matches!(outcome, PresentOutcome::Ignored));
    let last = view.last();
    assert_eq!(last.notice.as_ref().unwrap().kind, NoticeKind::SearchPrompt);
    assert!(!last.weather_visible());
}

#[tokio::test]
async fn test_load_uses_saved_city() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(timeline_path("Oslo")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(timeline_json("Oslo, Norway", "cloudy", 6)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    LastCityStore::new(dir.path()).save("Oslo").unwrap();
    let config = test_config(
        dir.path(),
        &server.uri(),
        "http://unused/json/",
        vec![LastCity, Auto],
        None,
    );
    let view = Arc::new(RecordingView::default());
    let app = WeatherApp::new(&config, view.clone()).unwrap();

    assert!(app.load().await.is_rendered());
}

#[tokio::test]
async fn test_load_shows_ip_city_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 15.5,
            "lon": 32.5,
            "city": "Khartoum"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(timeline_path("15.5,32.5")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(timeline_json("15.5,32.5", "clear-day", 6)),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        dir.path(),
        &server.uri(),
        &format!("{}/json/", server.uri()),
        vec![LastCity, Ip, Auto],
        None,
    );
    let view = Arc::new(RecordingView::default());
    let app = WeatherApp::new(&config, view.clone()).unwrap();

    assert!(app.load().await.is_rendered());
    let states = view.states();
    assert_eq!(
        states[0].loading.as_deref(),
        Some("Fetching weather for Khartoum...")
    );
    assert_eq!(view.last().card.unwrap().city, "Khartoum");
    // Only explicit searches are remembered.
    assert_eq!(LastCityStore::new(dir.path()).load(), None);
}

#[tokio::test]
async fn test_load_exhausted_shows_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        dir.path(),
        &server.uri(),
        "http://unused/json/",
        vec![LastCity, Timezone],
        Some("UTC"),
    );
    let view = Arc::new(RecordingView::default());
    let app = WeatherApp::new(&config, view.clone()).unwrap();

    let outcome = app.load().await;
    assert!(matches!(
        outcome,
        PresentOutcome::Failed(AppError::Location(LocationError::Exhausted))
    ));
    let last = view.last();
    assert!(last.error_visible());
    assert!(!last.weather_visible());
    assert!(!last.is_loading());
}

#[tokio::test]
async fn test_forget_last_city() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    LastCityStore::new(dir.path()).save("Oslo").unwrap();

    let config = test_config(dir.path(), &server.uri(), "http://unused/json/", vec![Auto], None);
    let app = WeatherApp::new(&config, Arc::new(RecordingView::default())).unwrap();

    app.forget_last_city().unwrap();
    assert_eq!(LastCityStore::new(dir.path()).load(), None);
}
