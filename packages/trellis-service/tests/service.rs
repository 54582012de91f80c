use serde_json::Map;

use trellis_config::{
	CompletionProviderConfig, Config, ImageSearchProviderConfig, MailProviderConfig, Postgres,
	Providers, Service, Storage, WeatherProviderConfig, WeatherThresholds,
};
use trellis_domain::{LibrarySearchCriteria, PageRequest, SortDirection};
use trellis_service::{
	GardenPlanInput, LibraryPlantInput, LikeRequest, PlantInput, PlantSearchRequest,
	TrellisService,
};
use trellis_storage::db::Db;
use trellis_testkit::TestDatabase;
use uuid::Uuid;

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

async fn test_service() -> Option<(TestDatabase, TrellisService)> {
	let base_dsn = match trellis_testkit::env_dsn() {
		Some(value) => value,
		None => {
			eprintln!("Skipping service tests; set TRELLIS_PG_DSN to run this test.");

			return None;
		},
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let config = test_config(test_db.dsn().to_string());
	let db = Db::connect(&config.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	Some((test_db, TrellisService::new(config, db)))
}

fn page(size: u32) -> PageRequest {
	PageRequest { page: 0, size, sort: None, direction: SortDirection::Asc }
}

fn library_plant(common_name: &str, plant_type: &str, climate: &str) -> LibraryPlantInput {
	LibraryPlantInput {
		common_name: Some(common_name.to_string()),
		plant_type: Some(plant_type.to_string()),
		climate: Some(climate.to_string()),
		..Default::default()
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn empty_criteria_matches_every_record() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	for (name, plant_type) in [("Tomato", "Vegetable"), ("Basil", "Herb"), ("Rose", "Flower")] {
		service
			.create_library_plant(library_plant(name, plant_type, "temperate"))
			.await
			.expect("Failed to create plant.");
	}

	let unfiltered =
		service.list_library_plants(page(10)).await.expect("Failed to list plants.");
	let advanced = service
		.search_library_plants_advanced(LibrarySearchCriteria::default(), page(10))
		.await
		.expect("Failed to run advanced search.");

	assert_eq!(advanced.total, unfiltered.total);
	assert_eq!(advanced.items.len(), unfiltered.items.len());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn single_string_criterion_matches_case_insensitively() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	service
		.create_library_plant(library_plant("Cherry Tomato", "Vegetable", "temperate"))
		.await
		.expect("Failed to create plant.");
	service
		.create_library_plant(library_plant("Basil", "Herb", "mediterranean"))
		.await
		.expect("Failed to create plant.");

	let criteria = LibrarySearchCriteria {
		common_name: Some("TOMATO".to_string()),
		..Default::default()
	};
	let result = service
		.search_library_plants_advanced(criteria, page(10))
		.await
		.expect("Failed to run advanced search.");

	assert_eq!(result.total, 1);
	assert_eq!(result.items[0].common_name.as_deref(), Some("Cherry Tomato"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn advanced_search_is_strict_and_across_fields() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	// Matches both criteria.
	service
		.create_library_plant(library_plant("Roma Tomato", "Vegetable", "temperate"))
		.await
		.expect("Failed to create plant.");
	// Matches the name only.
	service
		.create_library_plant(library_plant("Tomatillo", "Vegetable", "arid"))
		.await
		.expect("Failed to create plant.");

	let criteria = LibrarySearchCriteria {
		common_name: Some("toma".to_string()),
		climate: Some("temperate".to_string()),
		..Default::default()
	};
	let result = service
		.search_library_plants_advanced(criteria, page(10))
		.await
		.expect("Failed to run advanced search.");

	assert_eq!(result.total, 1, "a record matching only one of two set fields must not appear");
	assert_eq!(result.items[0].common_name.as_deref(), Some("Roma Tomato"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn blank_plain_query_equals_unfiltered_listing() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	for name in ["Tomato", "Basil"] {
		service
			.create_library_plant(library_plant(name, "Vegetable", "temperate"))
			.await
			.expect("Failed to create plant.");
	}

	let unfiltered =
		service.list_library_plants(page(10)).await.expect("Failed to list plants.");
	let blank = service
		.search_library_plants(Some("   "), page(10))
		.await
		.expect("Failed to search plants.");
	let absent =
		service.search_library_plants(None, page(10)).await.expect("Failed to search plants.");

	assert_eq!(blank.total, unfiltered.total);
	assert_eq!(absent.total, unfiltered.total);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn plain_search_ors_across_attributes() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	// "shade" appears in different attributes of different plants.
	let mut fern = library_plant("Fern", "Foliage", "temperate");

	fern.ideal_place = Some("shade border".to_string());

	let mut hosta = library_plant("Shade Lily", "Foliage", "temperate");

	hosta.ideal_place = Some("anywhere".to_string());

	service.create_library_plant(fern).await.expect("Failed to create plant.");
	service.create_library_plant(hosta).await.expect("Failed to create plant.");
	service
		.create_library_plant(library_plant("Cactus", "Succulent", "arid"))
		.await
		.expect("Failed to create plant.");

	let result = service
		.search_library_plants(Some("shade"), page(10))
		.await
		.expect("Failed to search plants.");

	assert_eq!(result.total, 2, "a hit in any searchable attribute must match");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn zero_match_numeric_criterion_returns_empty_page() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	let mut plant = library_plant("Carrot", "Vegetable", "temperate");

	plant.time_to_harvest = Some(70.0);

	service.create_library_plant(plant).await.expect("Failed to create plant.");

	let criteria =
		LibrarySearchCriteria { time_to_harvest: Some(9_999.0), ..Default::default() };
	let result = service
		.search_library_plants_advanced(criteria, page(10))
		.await
		.expect("Zero matches must not be an error.");

	assert_eq!(result.total, 0);
	assert!(result.items.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn create_then_get_round_trips_all_fields() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	let mut input = library_plant("Sweet Basil", "Herb", "mediterranean");

	input.time_to_harvest = Some(60.0);
	input.medicinal = Some(true);
	input.companion_plants = Some(vec!["Tomato".to_string(), "Pepper".to_string()]);
	input.temperature_min = Some(10.0);
	input.temperature_max = Some(30.0);

	let created =
		service.create_library_plant(input).await.expect("Failed to create plant.");
	let fetched =
		service.get_library_plant(created.id).await.expect("Failed to fetch plant.");

	assert_eq!(fetched.common_name.as_deref(), Some("Sweet Basil"));
	assert_eq!(fetched.plant_type.as_deref(), Some("Herb"));
	assert_eq!(fetched.time_to_harvest, Some(60.0));
	assert_eq!(fetched.medicinal, Some(true));
	assert_eq!(
		fetched.companion_plants.as_deref(),
		Some(["Tomato".to_string(), "Pepper".to_string()].as_slice()),
	);
	assert_eq!(fetched.temperature_min, Some(10.0));
	assert_eq!(fetched.created_at, created.created_at);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn unlike_is_idempotent() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	let image_id = Uuid::new_v4();
	let user_id = Uuid::new_v4();

	service
		.create_image_like(LikeRequest { image_id, user_id })
		.await
		.expect("Failed to like image.");

	let first = service.unlike_image(image_id, user_id).await.expect("Failed to unlike.");
	let second =
		service.unlike_image(image_id, user_id).await.expect("Repeat unlike must not error.");

	assert!(first.removed);
	assert!(!second.removed);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn double_like_is_a_conflict() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	let request = LikeRequest { image_id: Uuid::new_v4(), user_id: Uuid::new_v4() };

	service.create_image_like(request).await.expect("Failed to like image.");

	let err = service.create_image_like(request).await.expect_err("Double like must conflict.");

	assert!(matches!(err, trellis_service::Error::Conflict { .. }));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn relevance_search_ranks_exact_name_matches_first() {
	let Some((test_db, service)) = test_service().await else {
		return;
	};

	let plan = service
		.create_garden_plan(GardenPlanInput {
			user_id: Uuid::new_v4(),
			name: "Balcony".to_string(),
			plan_type: "balcony".to_string(),
			description: None,
			location: None,
			thumbnail_url: None,
			is_public: false,
		})
		.await
		.expect("Failed to create garden plan.");

	for name in ["Mint Relative", "Mint"] {
		service
			.create_plant(PlantInput {
				garden_plan_id: plan.id,
				name: name.to_string(),
				plant_type: "herb".to_string(),
				description: None,
				watering_frequency: None,
				sunlight_requirements: None,
				position_x: None,
				position_y: None,
				image_url: None,
			})
			.await
			.expect("Failed to create plant.");
	}

	let result = service
		.search_plants_with_relevance(
			PlantSearchRequest { name: Some("Mint".to_string()), ..Default::default() },
			page(10),
		)
		.await
		.expect("Failed to run relevance search.");

	assert_eq!(result.total, 2);
	assert_eq!(result.items[0].name, "Mint", "the exact match must rank first");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
