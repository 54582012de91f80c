use trellis_config::Postgres;
use trellis_storage::db::Db;
use trellis_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn tables_exist_after_bootstrap() {
	let Some(base_dsn) = trellis_testkit::env_dsn() else {
		eprintln!("Skipping tables_exist_after_bootstrap; set TRELLIS_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	for table in [
		"library_plants",
		"garden_plans",
		"plants",
		"profiles",
		"garden_images",
		"image_comments",
		"image_likes",
		"plant_reminders",
		"pests",
		"plant_diseases",
	] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "table {table} must exist after bootstrap");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set TRELLIS_PG_DSN to run."]
async fn bootstrap_is_idempotent() {
	let Some(base_dsn) = trellis_testkit::env_dsn() else {
		eprintln!("Skipping bootstrap_is_idempotent; set TRELLIS_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	db.ensure_schema().await.expect("Schema bootstrap must be idempotent.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
