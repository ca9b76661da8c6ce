use quip_config::Postgres;
use quip_storage::db::Db;
use quip_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres. Set QUIP_PG_DSN to run."]
async fn db_connects_and_bootstraps_idempotently() {
	let Some(base_dsn) = quip_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps_idempotently; set QUIP_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	db.ensure_schema().await.expect("Failed to re-apply schema.");

	for table in ["categories", "moods", "captions", "generation_history"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "missing table {table}");
	}

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
