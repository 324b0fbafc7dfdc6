//! HTTP routes.

mod directory;
mod error;
mod events;
mod images;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use events::{EventsResponse, WindowQuery};

use crate::state::AppState;

/// Body of the health check.
pub const HEALTH_MESSAGE: &str = "ConnectUtahToday API is running.";

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/calendar-events", get(events::calendar_events))
        .route("/api/google-calendar", get(events::calendar_events))
        .route("/api/organizing-events", get(events::organizing_events))
        .route("/api/mobilize-events", get(events::organizing_events))
        .route("/api/image-events", get(events::image_events))
        .route("/api/all-events", get(events::all_events))
        .route(
            "/api/organizations",
            get(directory::list_organizations).post(directory::create_organization),
        )
        .route(
            "/api/opportunities",
            get(directory::list_opportunities).post(directory::create_opportunity),
        )
        .route("/api/images", get(images::list_images).post(images::create_image))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use cutoday_core::{EventSource, NormalizedEvent, TimeWindow, WindowPolicy};
    use cutoday_providers::mobilize::{MobilizeConfig, MobilizeProvider};
    use cutoday_providers::{
        Aggregator, BoxFuture, EventProvider, ProviderError, ProviderResult,
    };
    use cutoday_store::{ImageProvider, Store};

    use super::*;

    enum Outcome {
        Events(Vec<NormalizedEvent>),
        Fail,
        Panic,
    }

    struct Stub {
        name: &'static str,
        source: EventSource,
        outcome: Outcome,
    }

    impl EventProvider for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn source(&self) -> EventSource {
            self.source
        }

        fn fetch_events(&self, _window: TimeWindow) -> BoxFuture<'_, ProviderResult<Vec<NormalizedEvent>>> {
            Box::pin(async move {
                match &self.outcome {
                    Outcome::Events(events) => Ok(events.clone()),
                    Outcome::Fail => Err(ProviderError::upstream(500, "API error (500 Internal Server Error)")),
                    Outcome::Panic => panic!("stub panicked"),
                }
            })
        }
    }

    fn stub(name: &'static str, source: EventSource, outcome: Outcome) -> Arc<dyn EventProvider> {
        Arc::new(Stub {
            name,
            source,
            outcome,
        })
    }

    fn app_with(aggregator: Aggregator) -> Router {
        let store = Store::open_in_memory().unwrap();
        router(AppState::new(aggregator, store, WindowPolicy::default()))
    }

    fn app_with_store(store: Store) -> Router {
        let aggregator = Aggregator::default().with_provider(Arc::new(ImageProvider::new(store.clone())));
        router(AppState::new(aggregator, store, WindowPolicy::default()))
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn health_check() {
        let app = app_with(Aggregator::default());
        let resp = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], HEALTH_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = app_with(Aggregator::default());
        let (status, body) = send(&app, get_req("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn all_events_tolerates_failed_source() {
        let app = app_with(
            Aggregator::default()
                .with_provider(stub(
                    "google",
                    EventSource::Calendar,
                    Outcome::Events(vec![
                        NormalizedEvent::new(EventSource::Calendar, "a", "Picnic").with_date("2025-08-01"),
                    ]),
                ))
                .with_provider(stub("mobilize", EventSource::Organizing, Outcome::Fail)),
        );

        let (status, body) = send(&app, get_req("/api/all-events")).await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["date"], "2025-08-01");
        assert_eq!(items[0]["source"], "calendar");
    }

    #[tokio::test]
    async fn all_events_fails_only_when_every_source_panics() {
        let app = app_with(
            Aggregator::default()
                .with_provider(stub("google", EventSource::Calendar, Outcome::Panic))
                .with_provider(stub("mobilize", EventSource::Organizing, Outcome::Panic)),
        );
        let (status, body) = send(&app, get_req("/api/all-events")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch combined events");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn source_failure_is_500_with_details() {
        let app = app_with(
            Aggregator::default().with_provider(stub("google", EventSource::Calendar, Outcome::Fail)),
        );
        for uri in ["/api/calendar-events", "/api/google-calendar"] {
            let (status, body) = send(&app, get_req(uri)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], "Failed to fetch calendar events");
            assert_eq!(body["details"], "API error (500 Internal Server Error)");
        }
    }

    #[tokio::test]
    async fn unconfigured_source_is_404() {
        let app = app_with(Aggregator::default());
        let (status, body) = send(&app, get_req("/api/organizing-events")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
        assert!(body["details"].as_str().unwrap().contains("organizing"));
    }

    #[tokio::test]
    async fn bad_window_is_400() {
        let app = app_with(
            Aggregator::default().with_provider(stub("google", EventSource::Calendar, Outcome::Events(Vec::new()))),
        );

        let (status, body) = send(&app, get_req("/api/all-events?timeMin=yesterday")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"].as_str().unwrap().contains("timeMin"));

        let (status, _) = send(
            &app,
            get_req("/api/calendar-events?timeMin=2025-09-01T00:00:00Z&timeMax=2025-08-01T00:00:00Z"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn extreme_single_bound_is_400() {
        let app = app_with(
            Aggregator::default().with_provider(stub("google", EventSource::Calendar, Outcome::Events(Vec::new()))),
        );

        let (status, body) = send(&app, get_req("/api/all-events?timeMin=%2B262142-12-31")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"].as_str().unwrap().contains("out of range"));

        let (status, body) = send(&app, get_req("/api/calendar-events?timeMax=-262143-01-01")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"].as_str().unwrap().contains("timeMax"));
    }

    #[tokio::test]
    async fn organizing_events_keep_only_in_window_timeslots() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": null,
                "data": [{
                    "id": 501,
                    "title": "Summer canvass",
                    "sponsor": { "id": 1, "name": "Utah Votes" },
                    "browser_url": "https://www.mobilize.us/utahvotes/event/501/",
                    "event_type": "CANVASS",
                    "timeslots": [
                        { "id": 1, "start_date": 1755252000, "end_date": 1755259200 },
                        { "id": 2, "start_date": 1757030400, "end_date": null }
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let provider = MobilizeProvider::new(
            MobilizeConfig::default()
                .with_base_url(server.uri())
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap();
        let app = app_with(Aggregator::default().with_provider(Arc::new(provider)));

        let (status, body) = send(
            &app,
            get_req("/api/mobilize-events?timeMin=2025-08-01T00:00:00Z&timeMax=2025-09-01T00:00:00Z"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "organizing-501-1");
        assert_eq!(items[0]["date"], "2025-08-15T10:00:00.000Z");
        assert_eq!(items[0]["endDate"], "2025-08-15T12:00:00.000Z");
        assert_eq!(items[0]["org"], "Utah Votes");
        assert_eq!(items[0]["eventType"], "CANVASS");
        assert_eq!(items[0]["source"], "organizing");
    }

    #[tokio::test]
    async fn organizations_round_trip() {
        let app = app_with(Aggregator::default());

        let (status, body) = send(
            &app,
            post_json("/api/organizations", json!({ "name": "Utah Votes", "link": "https://utahvotes.org" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_i64().unwrap();

        send(&app, post_json("/api/organizations", json!({ "name": "Alliance" }))).await;

        let (status, body) = send(&app, get_req("/api/organizations")).await;
        assert_eq!(status, StatusCode::OK);
        let orgs = body["organizations"].as_array().unwrap();
        assert_eq!(orgs[0]["name"], "Alliance");
        assert_eq!(orgs[0]["link"], Value::Null);
        assert_eq!(orgs[1], json!({ "id": id, "name": "Utah Votes", "link": "https://utahvotes.org" }));
    }

    #[tokio::test]
    async fn organization_requires_name() {
        let app = app_with(Aggregator::default());

        let (status, body) = send(&app, post_json("/api/organizations", json!({ "name": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "name is required");

        let req = Request::builder()
            .method("POST")
            .uri("/api/organizations")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request");
    }

    #[tokio::test]
    async fn opportunities_flow() {
        let app = app_with(Aggregator::default());
        let (_, body) = send(&app, post_json("/api/organizations", json!({ "name": "Utah Votes" }))).await;
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            post_json("/api/opportunities", json!({ "organization_id": id, "opportunity": "Phone bank" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        // Form clients send ids as strings.
        let (status, _) = send(
            &app,
            post_json(
                "/api/opportunities",
                json!({ "organization_id": id.to_string(), "opportunity": "Canvass" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, get_req(&format!("/api/opportunities?organization_id={}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "opportunities": ["Phone bank", "Canvass"] }));
    }

    #[tokio::test]
    async fn opportunities_validation() {
        let app = app_with(Aggregator::default());

        let (status, body) = send(&app, get_req("/api/opportunities")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "organization_id is required");

        let (status, _) = send(&app, get_req("/api/opportunities?organization_id=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, post_json("/api/opportunities", json!({ "organization_id": 1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            post_json("/api/opportunities", json!({ "organization_id": 999, "opportunity": "X" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["details"], "organization 999 not found");
    }

    #[tokio::test]
    async fn images_feed_image_events() {
        let app = app_with_store(Store::open_in_memory().unwrap());

        let (status, _) = send(
            &app,
            post_json(
                "/api/images",
                json!({ "url": "https://cdn.example/flyer.png", "organization": "Utah Votes", "date": "2025-08-20" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        send(&app, post_json("/api/images", json!({ "url": "https://cdn.example/undated.png" }))).await;

        let (_, body) = send(&app, get_req("/api/images")).await;
        let images = body["images"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["url"], "https://cdn.example/undated.png");

        let (status, body) = send(
            &app,
            get_req("/api/image-events?timeMin=2025-08-01T00:00:00Z&timeMax=2025-09-01T00:00:00Z"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["image"], "https://cdn.example/flyer.png");
        assert_eq!(items[0]["eventType"], "flyer");
    }

    #[tokio::test]
    async fn image_validation() {
        let app = app_with_store(Store::open_in_memory().unwrap());

        let (status, body) = send(&app, post_json("/api/images", json!({ "organization": "X" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "url is required");

        let (status, _) = send(
            &app,
            post_json("/api/images", json!({ "url": "https://cdn.example/a.png", "date": "next friday" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = app_with(Aggregator::default());
        let req = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "https://connectutahtoday.org")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
