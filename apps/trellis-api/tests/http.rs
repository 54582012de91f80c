use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Map;
use tower::util::ServiceExt;

use trellis_api::{routes, state::AppState};
use trellis_config::{
	CompletionProviderConfig, Config, ImageSearchProviderConfig, MailProviderConfig, Postgres,
	Providers, Service, Storage, WeatherProviderConfig, WeatherThresholds,
};
use trellis_testkit::TestDatabase;

fn test_config(dsn: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 2 } },
		providers: Providers {
			weather: WeatherProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			completion: CompletionProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				temperature: 0.1,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			image_search: ImageSearchProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			mail: MailProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				from_email: "reminders@test.invalid".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		weather: WeatherThresholds {
			wind_kmph: 30.0,
			high_temp_c: 32.0,
			frost_temp_c: 2.0,
			heavy_rain_mm: 10.0,
			high_uv_index: 8.0,
		},
	}
}

async fn test_app() -> Option<(TestDatabase, axum::Router)> {
	let base_dsn = match trellis_testkit::env_dsn() {
		Some(value) => value,
		None => {
			eprintln!("Skipping HTTP tests; set TRELLIS_PG_DSN to run this test.");

			return None;
		},
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let config = test_config(test_db.dsn().to_string());
	let state = AppState::new(config).await.expect("Failed to initialize app state.");

	Some((test_db, routes::router(state)))
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&body).expect("Failed to parse response.")
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn health_ok() {
	let Some((test_db, app)) = test_app().await else {
		return;
	};
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn create_then_get_round_trips_through_the_envelope() {
	let Some((test_db, app)) = test_app().await else {
		return;
	};
	let payload = serde_json::json!({
		"common_name": "Sweet Basil",
		"plant_type": "Herb",
		"climate": "mediterranean",
		"time_to_harvest": 60.0,
		"medicinal": true,
	});
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/api/library-plants")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to create plant.");

	assert_eq!(response.status(), StatusCode::CREATED);

	let created = json_body(response).await;

	assert_eq!(created["status"], 201);
	assert_eq!(created["data"]["common_name"], "Sweet Basil");

	let id = created["data"]["id"].as_str().expect("Created plant must have an id.");
	let response = app
		.oneshot(
			Request::builder()
				.uri(format!("/api/library-plants/{id}"))
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to fetch plant.");

	assert_eq!(response.status(), StatusCode::OK);

	let fetched = json_body(response).await;

	assert_eq!(fetched["status"], 200);
	assert_eq!(fetched["data"]["common_name"], "Sweet Basil");
	assert_eq!(fetched["data"]["time_to_harvest"], 60.0);
	assert_eq!(fetched["data"]["medicinal"], true);
	assert!(fetched["data"]["created_at"].is_string());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn missing_plant_returns_the_error_envelope() {
	let Some((test_db, app)) = test_app().await else {
		return;
	};
	let response = app
		.oneshot(
			Request::builder()
				.uri("/api/library-plants/00000000-0000-0000-0000-000000000000")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call get.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let json = json_body(response).await;

	assert_eq!(json["status"], 404);
	assert_eq!(json["code"], "not_found");
	assert!(json["message"].is_string());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn advanced_search_with_no_matches_returns_an_empty_page() {
	let Some((test_db, app)) = test_app().await else {
		return;
	};
	let response = app
		.oneshot(
			Request::builder()
				.uri("/api/library-plants/search/advanced?time_to_harvest=9999")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call advanced search.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["data"]["total"], 0);
	assert_eq!(json["data"]["items"], serde_json::json!([]));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn unknown_sort_column_is_a_bad_request() {
	let Some((test_db, app)) = test_app().await else {
		return;
	};
	let response = app
		.oneshot(
			Request::builder()
				.uri("/api/library-plants?sort=evil;drop")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call list.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = json_body(response).await;

	assert_eq!(json["code"], "invalid_request");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn unlike_twice_reports_a_no_op_not_an_error() {
	let Some((test_db, app)) = test_app().await else {
		return;
	};
	let image_id = uuid::Uuid::new_v4();
	let user_id = uuid::Uuid::new_v4();
	let payload = serde_json::json!({ "image_id": image_id, "user_id": user_id });
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/api/image-likes")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to like image.");

	assert_eq!(response.status(), StatusCode::CREATED);

	let unlike_uri = format!("/api/image-likes/image/{image_id}/user/{user_id}");
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("DELETE")
				.uri(&unlike_uri)
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to unlike image.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["data"]["removed"], true);

	let response = app
		.oneshot(
			Request::builder()
				.method("DELETE")
				.uri(&unlike_uri)
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Repeat unlike must not error.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["data"]["removed"], false);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
